//! An in-memory [`Host`].
//!
//! `MemoryHost` keeps a session history stack, a location, and a queue of
//! deferred tasks, and lets callers inject clicks and history pops. It is
//! what the router's own tests run against and works for any non-browser
//! embedding that wants page-style routing.
//!
//! Deferred tasks only run when [`MemoryHost::run_pending`] is called, which
//! makes "next scheduling turn" behavior explicit in tests.
//!
//! ```
//! use spa_navigator::{ContextHandle, MemoryHost, Next, Options, Router};
//!
//! let host = MemoryHost::new();
//! let router = Router::new(host.clone());
//! router.route("/old", |_: &ContextHandle, _: Next| {}).unwrap();
//! router.redirect("/legacy", "/old").unwrap();
//! router.start(Options::new());
//!
//! router.show("/legacy");
//! assert_eq!(host.current_url(), "http://localhost/legacy");
//!
//! host.run_pending();
//! assert_eq!(host.current_url(), "http://localhost/old");
//! ```

use crate::click::ClickEvent;
use crate::context::State;
use crate::error::RouterError;
use crate::host::{ClickListener, Host, PopStateEvent, PopStateListener, Task};
use crate::location::Location;
use crate::{trace_log, warn_log};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone)]
struct Entry {
    location: Location,
    state: Option<State>,
    title: String,
}

struct Inner {
    entries: Vec<Entry>,
    index: usize,
    title: String,
    loaded: bool,
    desktop_shell: bool,
    tasks: VecDeque<Task>,
    click: Option<ClickListener>,
    popstate: Option<PopStateListener>,
    navigations: Vec<String>,
}

impl Inner {
    fn current(&self) -> &Entry {
        &self.entries[self.index]
    }

    fn current_mut(&mut self) -> &mut Entry {
        &mut self.entries[self.index]
    }
}

/// Synthetic host: history, location, and event delivery in memory.
///
/// Clones share the same state, so a test can keep one clone while the
/// router owns another.
#[derive(Clone)]
pub struct MemoryHost {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryHost {
    /// A host showing `http://localhost/`.
    pub fn new() -> Self {
        Self::at(Location::default())
    }

    /// A host showing `url`.
    pub fn with_url(url: &str) -> Result<Self, RouterError> {
        Ok(Self::at(Location::parse(url)?))
    }

    fn at(location: Location) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                entries: vec![Entry {
                    location,
                    state: None,
                    title: String::new(),
                }],
                index: 0,
                title: String::new(),
                loaded: true,
                desktop_shell: false,
                tasks: VecDeque::new(),
                click: None,
                popstate: None,
                navigations: Vec::new(),
            })),
        }
    }

    // ---- event injection ----

    /// Run deferred tasks until the queue is empty, including tasks queued
    /// while draining. Returns the number of tasks run.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            let task = self.inner.borrow_mut().tasks.pop_front();
            match task {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }

    /// Deliver a click to the bound listener. Returns whether the default
    /// action was prevented.
    pub fn click(&self, event: &mut ClickEvent) -> bool {
        let listener = self.inner.borrow().click.clone();
        if let Some(listener) = listener {
            listener(event);
        }
        event.is_default_prevented()
    }

    /// Deliver a popstate event carrying `state` without moving through
    /// history.
    pub fn pop(&self, state: Option<State>) {
        deliver_popstate(&self.inner, &PopStateEvent { state });
    }

    /// Traverse one frame forward, if there is one.
    pub fn forward(&self) {
        let moved = {
            let mut inner = self.inner.borrow_mut();
            if inner.index + 1 < inner.entries.len() {
                inner.index += 1;
                true
            } else {
                false
            }
        };
        if moved {
            self.queue_popstate();
        }
    }

    fn queue_popstate(&self) {
        let event = PopStateEvent {
            state: self.inner.borrow().current().state.clone(),
        };
        let inner = Rc::downgrade(&self.inner);
        self.inner
            .borrow_mut()
            .tasks
            .push_back(Box::new(move || deliver_later(&inner, &event)));
    }

    // ---- setters ----

    /// Point the current frame at `url` without notifying anyone, as a
    /// manual address-bar edit followed by a pop would.
    pub fn set_url(&self, url: &str) -> Result<(), RouterError> {
        let location = self.inner.borrow().current().location.resolve(url)?;
        self.inner.borrow_mut().current_mut().location = location;
        Ok(())
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.inner.borrow_mut().title = title.into();
    }

    pub fn set_loaded(&self, loaded: bool) {
        self.inner.borrow_mut().loaded = loaded;
    }

    pub fn set_desktop_shell(&self, desktop_shell: bool) {
        self.inner.borrow_mut().desktop_shell = desktop_shell;
    }

    // ---- accessors ----

    /// Number of frames in the session history.
    pub fn history_len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Index of the current frame.
    pub fn history_index(&self) -> usize {
        self.inner.borrow().index
    }

    /// The full URL of the current frame.
    pub fn current_url(&self) -> String {
        self.inner.borrow().current().location.href()
    }

    /// The state stored with the current frame.
    pub fn current_state(&self) -> Option<State> {
        self.inner.borrow().current().state.clone()
    }

    /// The title stored with the current frame.
    pub fn current_title(&self) -> String {
        self.inner.borrow().current().title.clone()
    }

    /// Full-document navigations performed through [`Host::assign`].
    pub fn navigations(&self) -> Vec<String> {
        self.inner.borrow().navigations.clone()
    }

    /// Deferred tasks waiting for [`run_pending`](Self::run_pending).
    pub fn pending(&self) -> usize {
        self.inner.borrow().tasks.len()
    }

    pub fn is_click_bound(&self) -> bool {
        self.inner.borrow().click.is_some()
    }

    pub fn is_popstate_bound(&self) -> bool {
        self.inner.borrow().popstate.is_some()
    }

    fn resolve(&self, url: &str) -> Option<Location> {
        let base = self.inner.borrow().current().location.clone();
        match base.resolve(url) {
            Ok(location) => Some(location),
            Err(err) => {
                warn_log!("MemoryHost: {}", err);
                None
            }
        }
    }

    fn push(&self, entry: Entry) {
        let mut inner = self.inner.borrow_mut();
        let keep = inner.index + 1;
        inner.entries.truncate(keep);
        inner.entries.push(entry);
        inner.index = keep;
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("MemoryHost")
                .field("url", &inner.current().location.href())
                .field("index", &inner.index)
                .field("entries", &inner.entries.len())
                .field("pending", &inner.tasks.len())
                .finish(),
            Err(_) => f.write_str("MemoryHost(<borrowed>)"),
        }
    }
}

fn deliver_popstate(inner: &Rc<RefCell<Inner>>, event: &PopStateEvent) {
    let listener = inner.borrow().popstate.clone();
    if let Some(listener) = listener {
        listener(event);
    }
}

fn deliver_later(inner: &Weak<RefCell<Inner>>, event: &PopStateEvent) {
    if let Some(inner) = inner.upgrade() {
        deliver_popstate(&inner, event);
    }
}

impl Host for MemoryHost {
    fn location(&self) -> Location {
        self.inner.borrow().current().location.clone()
    }

    fn title(&self) -> String {
        self.inner.borrow().title.clone()
    }

    fn push_state(&self, state: &State, title: &str, url: &str) {
        let Some(location) = self.resolve(url) else {
            return;
        };
        trace_log!("MemoryHost push '{}'", location.href());
        self.push(Entry {
            location,
            state: Some(state.clone()),
            title: title.to_string(),
        });
    }

    fn replace_state(&self, state: &State, title: &str, url: &str) {
        let Some(location) = self.resolve(url) else {
            return;
        };
        trace_log!("MemoryHost replace '{}'", location.href());
        *self.inner.borrow_mut().current_mut() = Entry {
            location,
            state: Some(state.clone()),
            title: title.to_string(),
        };
    }

    fn back(&self) {
        let moved = {
            let mut inner = self.inner.borrow_mut();
            if inner.index > 0 {
                inner.index -= 1;
                true
            } else {
                false
            }
        };
        if moved {
            self.queue_popstate();
        }
    }

    fn assign(&self, url: &str) {
        let Some(location) = self.resolve(url) else {
            return;
        };
        self.inner
            .borrow_mut()
            .navigations
            .push(location.href());
        self.push(Entry {
            location,
            state: None,
            title: String::new(),
        });
    }

    fn is_loaded(&self) -> bool {
        self.inner.borrow().loaded
    }

    fn defer(&self, task: Task) {
        self.inner.borrow_mut().tasks.push_back(task);
    }

    fn is_desktop_shell(&self) -> bool {
        self.inner.borrow().desktop_shell
    }

    fn bind_click(&self, listener: ClickListener) {
        self.inner.borrow_mut().click = Some(listener);
    }

    fn unbind_click(&self) {
        self.inner.borrow_mut().click = None;
    }

    fn bind_popstate(&self, listener: PopStateListener) {
        self.inner.borrow_mut().popstate = Some(listener);
    }

    fn unbind_popstate(&self) {
        self.inner.borrow_mut().popstate = None;
    }
}
