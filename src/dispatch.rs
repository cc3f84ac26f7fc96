//! Exit-then-enter dispatch.
//!
//! A navigation first runs the exit chain against the outgoing context, then
//! the enter chain against the incoming one. Routes are tried in
//! registration order; a matching route runs its handlers one after another
//! as long as each calls [`Next::proceed`]. Before every enter step the
//! router checks that the incoming context is still the live navigation, so
//! a handler that navigates synchronously ends the chain it was called from.

use crate::context::{ContextHandle, NavigationPhase};
use crate::handler::Next;
use crate::route::Route;
use crate::router::Router;
use crate::{debug_log, trace_log, warn_log};
use std::rc::Rc;

/// Position in a chain: route index and handler index within that route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cursor {
    route: usize,
    handler: usize,
}

impl Cursor {
    const START: Self = Self {
        route: 0,
        handler: 0,
    };

    fn next_route(self) -> Self {
        Self {
            route: self.route + 1,
            handler: 0,
        }
    }

    fn after(self, route: &Route) -> Self {
        if self.handler + 1 < route.len() {
            Self {
                handler: self.handler + 1,
                ..self
            }
        } else {
            self.next_route()
        }
    }
}

/// Where a [`Next`] resumes.
#[derive(Debug)]
pub(crate) enum Step {
    Exit {
        cursor: Cursor,
        prev: ContextHandle,
        ctx: ContextHandle,
    },
    Enter {
        cursor: Cursor,
        ctx: ContextHandle,
    },
}

impl Router {
    /// Run the exit chain for `prev` (if any), then the enter chain for `ctx`.
    pub(crate) fn dispatch(&self, ctx: ContextHandle, prev: Option<ContextHandle>) {
        match prev {
            Some(prev) => {
                ctx.set_phase(NavigationPhase::ExitDispatch);
                self.run_exit(Cursor::START, prev, ctx);
            }
            None => self.run_enter(Cursor::START, ctx),
        }
    }

    pub(crate) fn resume(&self, step: Step) {
        match step {
            Step::Exit { cursor, prev, ctx } => self.run_exit(cursor, prev, ctx),
            Step::Enter { cursor, ctx } => self.run_enter(cursor, ctx),
        }
    }

    fn run_exit(&self, mut cursor: Cursor, prev: ContextHandle, ctx: ContextHandle) {
        loop {
            let (route, decode) = {
                let state = self.state();
                (state.exits.get(cursor.route).cloned(), state.decode)
            };
            let Some(route) = route else {
                return self.run_enter(Cursor::START, ctx);
            };
            if cursor.handler == 0 && !accept(&route, &prev, decode) {
                cursor = cursor.next_route();
                continue;
            }
            let Some(handler) = route.handler(cursor.handler).map(Rc::clone) else {
                cursor = cursor.next_route();
                continue;
            };

            trace_log!(
                "exit '{}' -> {} ({})",
                prev.path(),
                route.path(),
                handler.name()
            );
            let next = Next::new(
                self.clone(),
                Step::Exit {
                    cursor: cursor.after(&route),
                    prev: prev.clone(),
                    ctx,
                },
            );
            handler.handle(&prev, next);
            return;
        }
    }

    fn run_enter(&self, mut cursor: Cursor, ctx: ContextHandle) {
        if cursor == Cursor::START {
            ctx.set_phase(NavigationPhase::EnterDispatch);
        }
        loop {
            let (route, current, decode) = {
                let state = self.state();
                (
                    state.enters.get(cursor.route).cloned(),
                    state.current.clone(),
                    state.decode,
                )
            };

            let path = ctx.path();
            if path != current {
                debug_log!("Dispatch of '{}' superseded by '{}'", path, current);
                ctx.set_handled(false);
                ctx.set_phase(NavigationPhase::Unhandled);
                return;
            }

            let Some(route) = route else {
                return self.unhandled(&ctx);
            };
            if cursor.handler == 0 {
                if !accept(&route, &ctx, decode) {
                    cursor = cursor.next_route();
                    continue;
                }
                ctx.set_phase(NavigationPhase::Settled);
            }
            let Some(handler) = route.handler(cursor.handler).map(Rc::clone) else {
                cursor = cursor.next_route();
                continue;
            };

            trace_log!("enter '{}' -> {} ({})", path, route.path(), handler.name());
            let next = Next::new(
                self.clone(),
                Step::Enter {
                    cursor: cursor.after(&route),
                    ctx: ctx.clone(),
                },
            );
            handler.handle(&ctx, next);
            return;
        }
    }

    /// No enter route took the context: fall back to a full navigation
    /// unless the host already shows it.
    fn unhandled(&self, ctx: &ContextHandle) {
        if ctx.handled() == Some(true) {
            return;
        }
        ctx.set_handled(false);
        ctx.set_phase(NavigationPhase::Unhandled);

        let canonical = ctx.canonical_path();
        let location = self.location();
        let hashbang = self.state().hashbang;
        let visible = if hashbang {
            format!(
                "{}{}",
                self.effective_base(),
                location.hash.replacen("#!", "", 1)
            )
        } else {
            format!("{}{}", location.pathname, location.search)
        };
        if visible == canonical {
            debug_log!("No route for '{}', already visible", canonical);
            return;
        }

        self.stop();
        warn_log!("No route for '{}', falling back to a full navigation", canonical);
        self.host().assign(&canonical);
    }
}

/// Match `route` against the context's path and merge its parameters.
fn accept(route: &Route, ctx: &ContextHandle, decode: bool) -> bool {
    let path = ctx.path();
    match route.matches(&path, decode) {
        Some(params) => {
            let mut ctx = ctx.borrow_mut();
            ctx.params.merge_missing(params);
            ctx.route_path = Some(route.path().to_string());
            true
        }
        None => false,
    }
}
