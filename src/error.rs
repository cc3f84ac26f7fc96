//! Error handling for the router.
//!
//! Only configuration problems surface as errors. Navigation itself never
//! fails from the caller's point of view: an unmatched path is reported
//! through [`Context::handled`](crate::Context::handled) and
//! [`NavigationPhase`](crate::NavigationPhase), and degrades to a full
//! document navigation performed by the host.
//!
//! # Examples
//!
//! ```
//! use spa_navigator::{PathPattern, PatternOptions, RouterError};
//!
//! let err = PathPattern::compile("/user/:id(", PatternOptions::default()).unwrap_err();
//! assert!(matches!(err, RouterError::InvalidPattern { .. }));
//! ```

use thiserror::Error;

/// Errors returned by route registration and URL parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// A route pattern could not be compiled.
    #[error("Invalid route pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A URL could not be parsed or resolved against the current location.
    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

impl RouterError {
    pub(crate) fn invalid_pattern(pattern: &str, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_url(url: &str, message: impl ToString) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            message: message.to_string(),
        }
    }
}
