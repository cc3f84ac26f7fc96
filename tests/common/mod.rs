//! Test utilities for router integration tests
//!
//! Provides a router bound to a fresh `MemoryHost` and recording handlers.

#![allow(dead_code)]

use spa_navigator::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Ordered log of handler invocations.
#[derive(Clone, Default)]
pub struct Calls(Rc<RefCell<Vec<String>>>);

impl Calls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    /// Handler that records `label` and stops the chain.
    pub fn stop(&self, label: &str) -> impl Fn(&ContextHandle, Next) + 'static {
        let calls = self.clone();
        let label = label.to_string();
        move |_ctx: &ContextHandle, _next: Next| calls.push(label.clone())
    }

    /// Handler that records `label` and proceeds.
    pub fn pass(&self, label: &str) -> impl Fn(&ContextHandle, Next) + 'static {
        let calls = self.clone();
        let label = label.to_string();
        move |_ctx: &ContextHandle, next: Next| {
            calls.push(label.clone());
            next.proceed();
        }
    }

    /// Handler that records `label:<path>` and stops.
    pub fn path(&self, label: &str) -> impl Fn(&ContextHandle, Next) + 'static {
        let calls = self.clone();
        let label = label.to_string();
        move |ctx: &ContextHandle, _next: Next| calls.push(format!("{}:{}", label, ctx.path()))
    }
}

/// Initialise test logging once.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A router on a host at `http://localhost/`, configured but not started.
pub fn setup() -> (Router, MemoryHost) {
    init_logging();
    let host = MemoryHost::new();
    let router = Router::new(host.clone());
    (router, host)
}

/// A router on a host at `url`.
pub fn setup_at(url: &str) -> (Router, MemoryHost) {
    init_logging();
    let host = MemoryHost::with_url(url).expect("valid test url");
    let router = Router::new(host.clone());
    (router, host)
}

/// Start without the initial dispatch (listeners bound, nothing dispatched).
pub fn start_quiet(router: &Router) {
    router.start(Options::new().dispatch(false));
}

/// Build a state payload from `(key, value)` pairs.
pub fn state(pairs: &[(&str, serde_json::Value)]) -> State {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}
