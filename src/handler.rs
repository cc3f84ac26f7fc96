//! Route handlers and the continuation that drives a handler chain.
//!
//! A handler receives the navigation's [`ContextHandle`] and a [`Next`]
//! continuation. Calling [`Next::proceed`] hands control to the next route in
//! registration order; dropping `Next` ends the chain. `Next` owns everything
//! it needs, so a handler may keep it and proceed later (after a data load,
//! for example) as long as it stays on the router's thread.
//!
//! # Example
//!
//! ```
//! use spa_navigator::{ContextHandle, MemoryHost, Next, RouteHandler, Router};
//!
//! struct RequireLogin;
//!
//! impl RouteHandler for RequireLogin {
//!     fn handle(&self, ctx: &ContextHandle, next: Next) {
//!         if ctx.borrow().state.contains_key("user") {
//!             next.proceed();
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "RequireLogin"
//!     }
//! }
//!
//! let router = Router::new(MemoryHost::new());
//! router.route("/account", RequireLogin).unwrap();
//! router.route("/account", |_ctx: &ContextHandle, _next: Next| {}).unwrap();
//! ```

use crate::context::ContextHandle;
use crate::dispatch::Step;
use crate::router::Router;
use std::fmt;
use std::rc::Rc;

// ============================================================================
// RouteHandler trait
// ============================================================================

/// A callback bound to a route pattern.
///
/// Enter handlers receive the incoming context. Exit handlers receive the
/// outgoing one.
pub trait RouteHandler: 'static {
    /// Handle the context. Call `next.proceed()` to continue the chain.
    fn handle(&self, ctx: &ContextHandle, next: Next);

    /// Handler name for debugging.
    fn name(&self) -> &'static str {
        "RouteHandler"
    }
}

impl<F> RouteHandler for F
where
    F: Fn(&ContextHandle, Next) + 'static,
{
    fn handle(&self, ctx: &ContextHandle, next: Next) {
        self(ctx, next);
    }

    fn name(&self) -> &'static str {
        "closure"
    }
}

/// A registered handler.
pub type Handler = Rc<dyn RouteHandler>;

/// Box a handler for [`Router::route_chain`](crate::Router::route_chain) and
/// [`Router::exit_chain`](crate::Router::exit_chain).
pub fn handler<H: RouteHandler>(handler: H) -> Handler {
    Rc::new(handler)
}

// ============================================================================
// Next
// ============================================================================

/// Continuation for the remainder of a handler chain.
#[must_use = "dropping `Next` without calling `proceed` ends the chain"]
pub struct Next {
    router: Router,
    step: Step,
}

impl Next {
    pub(crate) fn new(router: Router, step: Step) -> Self {
        Self { router, step }
    }

    /// Run the next matching handler. Once the enter chain runs out the
    /// navigation is treated as unhandled.
    pub fn proceed(self) {
        self.router.resume(self.step);
    }

    /// The router driving this chain.
    pub fn router(&self) -> &Router {
        &self.router
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next").field("step", &self.step).finish()
    }
}
