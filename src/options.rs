//! Configuration values for starting the router, registering routes, and
//! navigating.

use crate::context::State;
use crate::host::Host;
use std::fmt;
use std::rc::Rc;

// ============================================================================
// Options
// ============================================================================

/// Settings applied by [`Router::configure`](crate::Router::configure) and
/// [`Router::start`](crate::Router::start).
///
/// ```
/// use spa_navigator::Options;
///
/// let options = Options::new().hashbang(true).click(false);
/// assert!(options.hashbang);
/// assert!(!options.click);
/// assert!(options.popstate);
/// ```
#[derive(Clone)]
pub struct Options {
    /// Intercept same-origin link clicks.
    pub click: bool,
    /// Re-dispatch on history traversal.
    pub popstate: bool,
    /// Dispatch the current location when starting.
    pub dispatch: bool,
    /// Keep the route in a `#!` fragment.
    pub hashbang: bool,
    /// Decode `+` and `%XX` in paths, query strings, fragments, and params.
    pub decode_url_components: bool,
    /// Replace the router's host.
    pub host: Option<Rc<dyn Host>>,
}

impl Options {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable click interception.
    #[must_use]
    pub fn click(mut self, click: bool) -> Self {
        self.click = click;
        self
    }

    /// Enable or disable popstate handling.
    #[must_use]
    pub fn popstate(mut self, popstate: bool) -> Self {
        self.popstate = popstate;
        self
    }

    /// Enable or disable the initial dispatch.
    #[must_use]
    pub fn dispatch(mut self, dispatch: bool) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Enable or disable hashbang mode.
    #[must_use]
    pub fn hashbang(mut self, hashbang: bool) -> Self {
        self.hashbang = hashbang;
        self
    }

    /// Enable or disable URL component decoding.
    #[must_use]
    pub fn decode_url_components(mut self, decode: bool) -> Self {
        self.decode_url_components = decode;
        self
    }

    /// Attach the router to a different host.
    #[must_use]
    pub fn host(mut self, host: Rc<dyn Host>) -> Self {
        self.host = Some(host);
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            click: true,
            popstate: true,
            dispatch: true,
            hashbang: false,
            decode_url_components: true,
            host: None,
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("click", &self.click)
            .field("popstate", &self.popstate)
            .field("dispatch", &self.dispatch)
            .field("hashbang", &self.hashbang)
            .field("decode_url_components", &self.decode_url_components)
            .field("host", &self.host.is_some())
            .finish()
    }
}

// ============================================================================
// RouteOptions
// ============================================================================

/// Per-route matching flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteOptions {
    /// Case-sensitive matching.
    pub sensitive: bool,
    /// Trailing-slash strictness. `None` uses the router-wide setting.
    pub strict: Option<bool>,
}

impl RouteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sensitive(mut self, sensitive: bool) -> Self {
        self.sensitive = sensitive;
        self
    }

    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }
}

// ============================================================================
// NavigateOptions
// ============================================================================

/// Options for [`Router::show_with`](crate::Router::show_with) and
/// [`Router::replace_with`](crate::Router::replace_with).
#[derive(Debug, Clone, PartialEq)]
pub struct NavigateOptions {
    /// State payload stored with the history frame.
    pub state: Option<State>,
    /// Run the handler chains.
    pub dispatch: bool,
    /// Push a history frame after dispatch (`show` only).
    pub push: bool,
    /// Mark the context as the initial navigation (`replace` only).
    pub init: bool,
}

impl NavigateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(mut self, state: State) -> Self {
        self.state = Some(state);
        self
    }

    #[must_use]
    pub fn dispatch(mut self, dispatch: bool) -> Self {
        self.dispatch = dispatch;
        self
    }

    #[must_use]
    pub fn push(mut self, push: bool) -> Self {
        self.push = push;
        self
    }

    #[must_use]
    pub fn init(mut self, init: bool) -> Self {
        self.init = init;
        self
    }
}

impl Default for NavigateOptions {
    fn default() -> Self {
        Self {
            state: None,
            dispatch: true,
            push: true,
            init: false,
        }
    }
}
