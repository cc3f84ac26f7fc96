//! The host environment the router runs against.
//!
//! Everything the router needs from a browser goes through the [`Host`]
//! trait: the current location, session history, event delivery, and a way
//! to run code on the next turn of the event loop. [`MemoryHost`](crate::MemoryHost)
//! implements it in memory; `WebHost` (feature `web`) implements it on top of
//! `web-sys`.
//!
//! Hosts are single-threaded. The router calls them synchronously and never
//! while it holds a borrow of its own state, so a host may invoke router
//! listeners from inside any of these methods except where noted.

use crate::click::ClickEvent;
use crate::context::State;
use crate::location::Location;
use std::rc::Rc;

/// A unit of work scheduled with [`Host::defer`].
pub type Task = Box<dyn FnOnce()>;

/// Listener for pointer activation on the document.
pub type ClickListener = Rc<dyn Fn(&mut ClickEvent)>;

/// Listener for session history traversal.
pub type PopStateListener = Rc<dyn Fn(&PopStateEvent)>;

/// A history traversal reported by the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopStateEvent {
    /// The state payload stored with the frame being restored, if any.
    pub state: Option<State>,
}

impl PopStateEvent {
    /// A pop event carrying `state`.
    pub fn with_state(state: State) -> Self {
        Self { state: Some(state) }
    }
}

/// Host-environment interface: location reader, history sink, event source,
/// and scheduler.
pub trait Host {
    /// The location currently shown by the host.
    fn location(&self) -> Location;

    /// The document title.
    fn title(&self) -> String;

    /// Add a history frame. `url` may be relative to the current location.
    fn push_state(&self, state: &State, title: &str, url: &str);

    /// Overwrite the current history frame.
    fn replace_state(&self, state: &State, title: &str, url: &str);

    /// Traverse one frame back. Hosts report the traversal later through the
    /// popstate listener, never synchronously.
    fn back(&self);

    /// Leave the application: perform a full document navigation to `url`.
    fn assign(&self, url: &str);

    /// Whether the document has finished its initial load.
    fn is_loaded(&self) -> bool {
        true
    }

    /// Run `task` on the next scheduling turn.
    fn defer(&self, task: Task);

    /// Whether the app runs inside a packaged desktop shell that reports
    /// file paths as `/C:/...`.
    fn is_desktop_shell(&self) -> bool {
        false
    }

    /// Install the document-level click listener, replacing any previous one.
    fn bind_click(&self, listener: ClickListener);

    /// Remove the click listener.
    fn unbind_click(&self);

    /// Install the popstate listener, replacing any previous one.
    fn bind_popstate(&self, listener: PopStateListener);

    /// Remove the popstate listener.
    fn unbind_popstate(&self);
}
