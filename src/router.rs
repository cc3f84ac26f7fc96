//! The router: handler registration, navigation, and lifecycle.
//!
//! A [`Router`] is a cheap, clonable handle to one router instance. Every
//! instance owns its own chains, settings, and host, so several routers can
//! coexist (one per test, for example). Listeners installed on the host hold
//! only a weak reference back to the router.
//!
//! # Example
//!
//! ```
//! use spa_navigator::{ContextHandle, MemoryHost, Next, Options, Router};
//!
//! let host = MemoryHost::new();
//! let router = Router::new(host.clone());
//! router.set_base("/blog");
//!
//! router
//!     .route("/post/:slug", |ctx: &ContextHandle, _next: Next| {
//!         assert_eq!(ctx.param("slug").as_deref(), Some("hello-world"));
//!     })
//!     .unwrap();
//!
//! router.start(Options::new().dispatch(false));
//! let ctx = router.show("/blog/post/hello-world");
//!
//! assert_eq!(ctx.borrow().pathname, "/post/hello-world");
//! assert_eq!(host.current_url(), "http://localhost/blog/post/hello-world");
//! assert_eq!(router.history_len(), 1);
//! ```

use crate::click::ClickEvent;
use crate::context::{Context, ContextHandle, PathConfig, State};
use crate::error::RouterError;
use crate::handler::{Handler, Next, RouteHandler};
use crate::host::{Host, PopStateEvent};
use crate::location::Location;
use crate::options::{NavigateOptions, Options, RouteOptions};
use crate::pattern::{PathPattern, PatternOptions, WILDCARD};
use crate::route::Route;
use crate::{debug_log, error_log, info_log, trace_log};
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

#[cfg(feature = "cache")]
use crate::cache::PatternCache;

// ============================================================================
// Router state
// ============================================================================

/// Which chain a route is registered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Chain {
    Enter,
    Exit,
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enter => f.write_str("enter"),
            Self::Exit => f.write_str("exit"),
        }
    }
}

/// Mutable router state.
pub(crate) struct RouterState {
    pub(crate) enters: Vec<Rc<Route>>,
    pub(crate) exits: Vec<Rc<Route>>,
    /// Path of the most recent navigation; empty when stopped.
    pub(crate) current: String,
    /// History frames pushed by the router and not yet traversed back.
    pub(crate) len: usize,
    pub(crate) prev: Option<ContextHandle>,
    pub(crate) running: bool,
    pub(crate) base: String,
    pub(crate) strict: bool,
    pub(crate) hashbang: bool,
    pub(crate) decode: bool,
    pub(crate) click: bool,
    pub(crate) popstate: bool,
    #[cfg(feature = "cache")]
    patterns: PatternCache,
}

impl RouterState {
    fn new() -> Self {
        Self {
            enters: Vec::new(),
            exits: Vec::new(),
            current: String::new(),
            len: 0,
            prev: None,
            running: false,
            base: String::new(),
            strict: false,
            hashbang: false,
            decode: true,
            click: true,
            popstate: true,
            #[cfg(feature = "cache")]
            patterns: PatternCache::new(),
        }
    }

    #[cfg(feature = "cache")]
    fn compile(&mut self, pattern: &str, options: PatternOptions) -> Result<PathPattern, RouterError> {
        self.patterns.get_or_compile(pattern, options)
    }

    #[cfg(not(feature = "cache"))]
    fn compile(&mut self, pattern: &str, options: PatternOptions) -> Result<PathPattern, RouterError> {
        PathPattern::compile(pattern, options)
    }
}

pub(crate) struct Shared {
    state: RefCell<RouterState>,
    host: RefCell<Rc<dyn Host>>,
}

// ============================================================================
// Router
// ============================================================================

/// Handle to a router instance.
#[derive(Clone)]
pub struct Router {
    shared: Rc<Shared>,
}

impl Router {
    /// Create a router bound to `host`. Nothing is intercepted until
    /// [`start`](Self::start) or [`configure`](Self::configure).
    pub fn new(host: impl Host + 'static) -> Self {
        Self::with_host(Rc::new(host))
    }

    /// Create a router bound to a shared host.
    pub fn with_host(host: Rc<dyn Host>) -> Self {
        Self {
            shared: Rc::new(Shared {
                state: RefCell::new(RouterState::new()),
                host: RefCell::new(host),
            }),
        }
    }

    pub(crate) fn state(&self) -> Ref<'_, RouterState> {
        self.shared.state.borrow()
    }

    pub(crate) fn state_mut(&self) -> RefMut<'_, RouterState> {
        self.shared.state.borrow_mut()
    }

    /// The host the router is attached to.
    pub fn host(&self) -> Rc<dyn Host> {
        Rc::clone(&self.shared.host.borrow())
    }

    pub(crate) fn downgrade(&self) -> Weak<Shared> {
        Rc::downgrade(&self.shared)
    }

    pub(crate) fn upgrade(weak: &Weak<Shared>) -> Option<Self> {
        weak.upgrade().map(|shared| Self { shared })
    }

    /// `true` if both handles refer to the same router.
    pub fn ptr_eq(&self, other: &Router) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    // ---- registration ----

    /// Bind `handler` to `pattern` in the enter chain.
    pub fn route<H: RouteHandler>(&self, pattern: &str, handler: H) -> Result<(), RouterError> {
        self.register(Chain::Enter, pattern, RouteOptions::default(), vec![Rc::new(handler)])
    }

    /// Bind `handler` to `pattern` with explicit matching flags.
    pub fn route_with<H: RouteHandler>(
        &self,
        pattern: &str,
        options: RouteOptions,
        handler: H,
    ) -> Result<(), RouterError> {
        self.register(Chain::Enter, pattern, options, vec![Rc::new(handler)])
    }

    /// Bind several handlers to one pattern. They run in order, each
    /// proceeding to the next.
    pub fn route_chain(&self, pattern: &str, handlers: Vec<Handler>) -> Result<(), RouterError> {
        self.register(Chain::Enter, pattern, RouteOptions::default(), handlers)
    }

    /// Bind `handler` to every path in the enter chain.
    pub fn middleware<H: RouteHandler>(&self, handler: H) -> Result<(), RouterError> {
        self.route(WILDCARD, handler)
    }

    /// Bind `handler` to `pattern` in the exit chain. It runs with the
    /// outgoing context when the router navigates away from a matching path.
    pub fn exit<H: RouteHandler>(&self, pattern: &str, handler: H) -> Result<(), RouterError> {
        self.register(Chain::Exit, pattern, RouteOptions::default(), vec![Rc::new(handler)])
    }

    /// Bind several exit handlers to one pattern.
    pub fn exit_chain(&self, pattern: &str, handlers: Vec<Handler>) -> Result<(), RouterError> {
        self.register(Chain::Exit, pattern, RouteOptions::default(), handlers)
    }

    /// Bind `handler` to every path in the exit chain.
    pub fn exit_any<H: RouteHandler>(&self, handler: H) -> Result<(), RouterError> {
        self.exit(WILDCARD, handler)
    }

    /// Register a static redirect. Navigating to `from` replaces the
    /// current frame with `to` on the next scheduling turn.
    pub fn redirect(&self, from: &str, to: &str) -> Result<(), RouterError> {
        let router = self.downgrade();
        let target = to.to_string();
        self.route(from, move |ctx: &ContextHandle, _next: Next| {
            if let Some(router) = Router::upgrade(&router) {
                debug_log!("Redirecting '{}' to '{}'", ctx.path(), target);
                router.defer_replace(target.clone());
            }
        })
    }

    /// Replace the current frame with `path` on the next scheduling turn.
    pub fn redirect_to(&self, path: &str) {
        self.defer_replace(path.to_string());
    }

    fn defer_replace(&self, path: String) {
        let router = self.downgrade();
        self.host().defer(Box::new(move || {
            if let Some(router) = Router::upgrade(&router) {
                router.replace(&path);
            }
        }));
    }

    fn register(
        &self,
        chain: Chain,
        pattern: &str,
        options: RouteOptions,
        handlers: Vec<Handler>,
    ) -> Result<(), RouterError> {
        let mut state = self.state_mut();
        let flags = PatternOptions::default()
            .sensitive(options.sensitive)
            .strict(options.strict.unwrap_or(state.strict));
        let compiled = state.compile(pattern, flags).map_err(|err| {
            error_log!("{}", err);
            err
        })?;

        info_log!(
            "Registered {} route '{}' with {} handler(s)",
            chain,
            pattern,
            handlers.len()
        );
        let route = Rc::new(Route::new(compiled, handlers));
        match chain {
            Chain::Enter => state.enters.push(route),
            Chain::Exit => state.exits.push(route),
        }
        Ok(())
    }

    // ---- navigation ----

    fn context(&self, path: &str, state: Option<State>) -> ContextHandle {
        let base = self.effective_base();
        let (hashbang, decode) = {
            let router = self.state();
            (router.hashbang, router.decode)
        };
        let title = self.host().title();
        let config = PathConfig {
            base: &base,
            hashbang,
            decode_url_components: decode,
        };
        ContextHandle::new(Context::new(path, state, title, config))
    }

    /// Navigate to `path`, pushing a history frame.
    pub fn show(&self, path: &str) -> ContextHandle {
        self.show_with(path, NavigateOptions::default())
    }

    /// Navigate to `path`.
    ///
    /// The frame is pushed after dispatch, and only if the navigation was not
    /// marked unhandled.
    pub fn show_with(&self, path: &str, options: NavigateOptions) -> ContextHandle {
        let ctx = self.context(path, options.state);
        debug_log!("show '{}'", ctx.canonical_path());
        let prev = self.begin(&ctx);

        if options.dispatch {
            self.dispatch(ctx.clone(), prev);
        }
        if options.push && ctx.handled() != Some(false) {
            self.push_state(&ctx.borrow());
        }
        ctx
    }

    /// Navigate to `path`, overwriting the current history frame.
    pub fn replace(&self, path: &str) -> ContextHandle {
        self.replace_with(path, NavigateOptions::default())
    }

    /// Navigate to `path`, overwriting the current history frame.
    ///
    /// The frame is saved before dispatch, so a handler that redirects
    /// leaves no orphaned frame behind.
    pub fn replace_with(&self, path: &str, options: NavigateOptions) -> ContextHandle {
        let ctx = self.context(path, Some(options.state.unwrap_or_default()));
        debug_log!("replace '{}'", ctx.canonical_path());
        let prev = self.begin(&ctx);
        ctx.borrow_mut().init = options.init;
        self.save(&ctx.borrow());

        if options.dispatch {
            self.dispatch(ctx.clone(), prev);
        }
        ctx
    }

    /// Make `ctx` the live navigation and return the one it replaces.
    fn begin(&self, ctx: &ContextHandle) -> Option<ContextHandle> {
        let path = ctx.path();
        let mut state = self.state_mut();
        state.current = path;
        state.prev.replace(ctx.clone())
    }

    /// Go back one frame, or to `fallback` (then the base path) on the next
    /// scheduling turn when the router has pushed nothing.
    pub fn back(&self, fallback: Option<&str>, state: Option<State>) {
        let pushed = {
            let mut router = self.state_mut();
            if router.len > 0 {
                router.len -= 1;
                true
            } else {
                false
            }
        };
        if pushed {
            trace_log!("back: native traversal");
            self.host().back();
            return;
        }

        let target = match fallback {
            Some(path) => path.to_string(),
            None => self.effective_base(),
        };
        debug_log!("back: no frames pushed, showing '{}'", target);
        let router = self.downgrade();
        self.host().defer(Box::new(move || {
            if let Some(router) = Router::upgrade(&router) {
                router.show_with(
                    &target,
                    NavigateOptions {
                        state,
                        ..NavigateOptions::default()
                    },
                );
            }
        }));
    }

    // ---- lifecycle ----

    /// Apply `options`, bind listeners, and dispatch the host's current
    /// location as the initial navigation (unless `options.dispatch` is off).
    pub fn start(&self, options: Options) {
        let dispatch = options.dispatch;
        self.configure(options);
        if !dispatch {
            return;
        }
        self.state_mut().running = true;

        let location = self.host().location();
        let hashbang = self.state().hashbang;
        let url = if hashbang && location.hash.contains("#!") {
            format!(
                "{}{}",
                location.hash.get(2..).unwrap_or_default(),
                location.search
            )
        } else if hashbang {
            format!("{}{}", location.search, location.hash)
        } else {
            location.path()
        };
        info_log!("Router started at '{}'", url);

        self.replace_with(
            &url,
            NavigateOptions {
                init: true,
                ..NavigateOptions::default()
            },
        );
    }

    /// Detach listeners and reset the current path and frame counter.
    pub fn stop(&self) {
        let click = {
            let mut state = self.state_mut();
            if !state.running {
                return;
            }
            state.current.clear();
            state.len = 0;
            state.running = false;
            state.click
        };
        let host = self.host();
        if click {
            host.unbind_click();
        }
        host.unbind_popstate();
        info_log!("Router stopped");
    }

    /// Apply `options` without dispatching. Listeners are bound or unbound
    /// according to `click` and `popstate`.
    pub fn configure(&self, options: Options) {
        if let Some(host) = options.host {
            let old = self.host();
            old.unbind_click();
            old.unbind_popstate();
            *self.shared.host.borrow_mut() = host;
        }
        {
            let mut state = self.state_mut();
            state.click = options.click;
            state.popstate = options.popstate;
            state.hashbang = options.hashbang;
            state.decode = options.decode_url_components;
        }

        let host = self.host();
        if options.popstate {
            let router = self.downgrade();
            host.bind_popstate(Rc::new(move |event: &PopStateEvent| {
                if let Some(router) = Router::upgrade(&router) {
                    router.handle_popstate(event);
                }
            }));
        } else {
            host.unbind_popstate();
        }
        if options.click {
            let router = self.downgrade();
            host.bind_click(Rc::new(move |event: &mut ClickEvent| {
                if let Some(router) = Router::upgrade(&router) {
                    router.handle_click(event);
                }
            }));
        } else {
            host.unbind_click();
        }
    }

    // ---- introspection ----

    /// Path of the live navigation, relative to the base.
    pub fn current(&self) -> String {
        self.state().current.clone()
    }

    /// Number of frames the router has pushed and not traversed back.
    pub fn history_len(&self) -> usize {
        self.state().len
    }

    /// The configured base path.
    pub fn base(&self) -> String {
        self.state().base.clone()
    }

    /// Set the base path. Paths shown afterwards are prefixed with it.
    pub fn set_base(&self, base: &str) {
        self.state_mut().base = base.to_string();
    }

    /// Router-wide trailing-slash strictness default.
    pub fn strict(&self) -> bool {
        self.state().strict
    }

    /// Set the strictness default for routes registered afterwards.
    pub fn set_strict(&self, strict: bool) {
        self.state_mut().strict = strict;
    }

    /// Whether [`start`](Self::start) dispatched and [`stop`](Self::stop)
    /// has not run since.
    pub fn is_running(&self) -> bool {
        self.state().running
    }

    /// The context of the last navigation.
    pub fn previous(&self) -> Option<ContextHandle> {
        self.state().prev.clone()
    }

    /// The base path, or the document path when running from `file:` in
    /// hashbang mode without an explicit base.
    pub fn effective_base(&self) -> String {
        let (base, hashbang) = {
            let state = self.state();
            (state.base.clone(), state.hashbang)
        };
        if !base.is_empty() || !hashbang {
            return base;
        }
        let location = self.host().location();
        if location.is_file() {
            location.pathname
        } else {
            base
        }
    }

    /// Whether `href` shares protocol, hostname, and port with the host's
    /// current location.
    pub fn same_origin(&self, href: &str) -> bool {
        if href.is_empty() {
            return false;
        }
        let location = self.host().location();
        match location.resolve(href) {
            Ok(target) => location.same_origin(&target),
            Err(_) => false,
        }
    }

    pub(crate) fn location(&self) -> Location {
        self.host().location()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shared.state.try_borrow() {
            Ok(state) => f
                .debug_struct("Router")
                .field("current", &state.current)
                .field("len", &state.len)
                .field("running", &state.running)
                .field("base", &state.base)
                .field("hashbang", &state.hashbang)
                .field("click", &state.click)
                .field("popstate", &state.popstate)
                .field("enters", &state.enters)
                .field("exits", &state.exits)
                .finish(),
            Err(_) => f.write_str("Router(<borrowed>)"),
        }
    }
}
