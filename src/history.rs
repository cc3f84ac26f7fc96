//! Session history synchronisation.
//!
//! Frames are committed with the context's state payload (which always
//! carries the canonical `path`), so a later popstate can replay the
//! navigation exactly.

use crate::context::Context;
use crate::host::PopStateEvent;
use crate::options::NavigateOptions;
use crate::router::Router;
use crate::{debug_log, trace_log};
use serde_json::Value;

impl Router {
    /// Push a history frame for `ctx` and count it.
    pub fn push_state(&self, ctx: &Context) {
        let url = {
            let mut state = self.state_mut();
            state.len += 1;
            frame_url(ctx, state.hashbang)
        };
        trace_log!("pushState '{}'", url);
        self.host().push_state(&ctx.state, &ctx.title, &url);
    }

    /// Overwrite the current history frame with `ctx`.
    pub fn save(&self, ctx: &Context) {
        let url = frame_url(ctx, self.state().hashbang);
        trace_log!("replaceState '{}'", url);
        self.host().replace_state(&ctx.state, &ctx.title, &url);
    }

    /// Replay a history traversal.
    ///
    /// Frames written by the router carry their path and are replayed with
    /// [`replace_with`](Self::replace_with); anything else is shown from the
    /// host's location without pushing.
    pub fn handle_popstate(&self, event: &PopStateEvent) {
        let host = self.host();
        if !host.is_loaded() {
            trace_log!("popstate before load ignored");
            return;
        }

        let stored = event.state.as_ref().and_then(|state| match state.get("path") {
            Some(Value::String(path)) => Some((path.clone(), state.clone())),
            _ => None,
        });
        match stored {
            Some((path, state)) => {
                debug_log!("popstate replay '{}'", path);
                self.replace_with(&path, NavigateOptions::new().state(state));
            }
            None => {
                let path = host.location().path();
                debug_log!("popstate without state, showing '{}'", path);
                self.show_with(&path, NavigateOptions::new().push(false));
            }
        }
    }
}

fn frame_url(ctx: &Context, hashbang: bool) -> String {
    if hashbang && ctx.path != "/" {
        format!("#!{}", ctx.path)
    } else {
        ctx.canonical_path.clone()
    }
}
