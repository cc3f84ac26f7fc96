//! Registered routes.

use crate::handler::Handler;
use crate::params::RouteParams;
use crate::pattern::PathPattern;
use std::fmt;

/// A compiled pattern bound to an ordered list of handlers.
///
/// Routes are immutable once registered. The router tries them in
/// registration order and the first matching route runs its first handler.
pub struct Route {
    pattern: PathPattern,
    handlers: Vec<Handler>,
}

impl Route {
    pub(crate) fn new(pattern: PathPattern, handlers: Vec<Handler>) -> Self {
        Self { pattern, handlers }
    }

    /// The pattern text the route was registered with.
    pub fn path(&self) -> &str {
        self.pattern.source()
    }

    /// The compiled pattern.
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub(crate) fn handler(&self, index: usize) -> Option<&Handler> {
        self.handlers.get(index)
    }

    /// Number of handlers bound to this route.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Match `path` (which may carry a query string).
    pub fn matches(&self, path: &str, decode: bool) -> Option<RouteParams> {
        self.pattern.matches(path, decode)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.handlers.iter().map(|handler| handler.name()).collect();
        f.debug_struct("Route")
            .field("path", &self.path())
            .field("handlers", &names)
            .finish()
    }
}
