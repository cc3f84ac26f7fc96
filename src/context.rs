//! Per-navigation context.
//!
//! Every navigation attempt builds one [`Context`]. It is derived from the
//! requested path and the router's base/hashbang/decoding settings, then
//! handed to every handler in the dispatch chain through a shared
//! [`ContextHandle`]. During dispatch only the parameter map, the handled
//! flag, and handler-owned `locals` change.
//!
//! # Example
//!
//! ```
//! use spa_navigator::{Context, PathConfig};
//!
//! let config = PathConfig { base: "/blog", hashbang: false, decode_url_components: true };
//! let ctx = Context::new("/post/hello-world?ref=feed#comments", None, "Blog", config);
//!
//! assert_eq!(ctx.canonical_path, "/blog/post/hello-world?ref=feed#comments");
//! assert_eq!(ctx.path, "/post/hello-world?ref=feed");
//! assert_eq!(ctx.pathname, "/post/hello-world");
//! assert_eq!(ctx.querystring, "ref=feed");
//! assert_eq!(ctx.hash, "comments");
//! assert_eq!(ctx.state["path"], "/blog/post/hello-world?ref=feed#comments");
//! ```

use crate::params::{decode_url_component, QueryParams, RouteParams};
use serde_json::{Map, Value};
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// History state payload: an opaque JSON object. The router injects a
/// `path` field holding the canonical path.
pub type State = Map<String, Value>;

/// Where a context is in the dispatch protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NavigationPhase {
    /// Built but not dispatched.
    #[default]
    Idle,
    /// The exit chain of the previous context is running.
    ExitDispatch,
    /// The enter chain is running and no route has accepted the context yet.
    EnterDispatch,
    /// An enter route accepted the context.
    Settled,
    /// No enter route handled the context, or a newer navigation replaced it.
    Unhandled,
}

/// Router settings that shape how a raw path is split.
#[derive(Debug, Clone, Copy)]
pub struct PathConfig<'a> {
    /// Effective base path (may be empty).
    pub base: &'a str,
    /// Route lives in the `#!` fragment.
    pub hashbang: bool,
    /// Decode `+` and `%XX` in the pathname, query string, and fragment.
    pub decode_url_components: bool,
}

/// One navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    /// Full path including the base (and `#!` in hashbang mode), query, and fragment.
    pub canonical_path: String,
    /// Path relative to the base, including the query string, without fragment.
    pub path: String,
    /// Decoded path without query string.
    pub pathname: String,
    /// Decoded query string without the leading `?`.
    pub querystring: String,
    /// Decoded fragment without the leading `#`; always empty in hashbang mode.
    pub hash: String,
    /// Parameters accumulated from every route that matched.
    pub params: RouteParams,
    /// History state payload, including the injected `path`.
    pub state: State,
    /// Document title when the context was built.
    pub title: String,
    /// `Some(false)` once the navigation is known to be unhandled; handlers
    /// may set `Some(true)` to opt out of the native-navigation fallback.
    pub handled: Option<bool>,
    /// Built by the initial dispatch of `start`.
    pub init: bool,
    /// Pattern of the last route that accepted this context.
    pub route_path: Option<String>,
    /// Scratch space shared by handlers along the chain.
    pub locals: Map<String, Value>,
    phase: NavigationPhase,
    raw_query: String,
}

impl Context {
    /// Build the context for `path`.
    pub fn new(
        path: &str,
        state: Option<State>,
        title: impl Into<String>,
        config: PathConfig<'_>,
    ) -> Self {
        let decode = |value: &str| {
            if config.decode_url_components {
                decode_url_component(value)
            } else {
                value.to_string()
            }
        };

        let canonical_path = if path.starts_with('/') && !path.starts_with(config.base) {
            let marker = if config.hashbang { "#!" } else { "" };
            format!("{}{}{}", config.base, marker, path)
        } else {
            path.to_string()
        };

        let mut path = or_root(
            canonical_path
                .strip_prefix(config.base)
                .unwrap_or(&canonical_path),
        );
        if config.hashbang {
            path = or_root(&path.replacen("#!", "", 1));
        }

        let mut hash = String::new();
        if !config.hashbang {
            if let Some((before, fragment)) = path.split_once('#') {
                hash = decode(fragment);
                path = or_root(before);
            }
        }

        let (raw_pathname, raw_query) = path.split_once('?').unwrap_or((path.as_str(), ""));
        let pathname = decode(raw_pathname);
        let querystring = decode(raw_query);
        let raw_query = raw_query.to_string();

        let mut state = state.unwrap_or_default();
        state.insert("path".to_string(), Value::String(canonical_path.clone()));

        Self {
            canonical_path,
            path,
            pathname,
            querystring,
            hash,
            params: RouteParams::new(),
            state,
            title: title.into(),
            handled: None,
            init: false,
            route_path: None,
            locals: Map::new(),
            phase: NavigationPhase::Idle,
            raw_query,
        }
    }

    /// Parse the query string into key/value pairs.
    pub fn query(&self) -> QueryParams {
        QueryParams::from_query_string(&self.raw_query)
    }

    /// Current dispatch phase.
    pub fn phase(&self) -> NavigationPhase {
        self.phase
    }

    /// `true` once the router has given up on this navigation.
    pub fn is_unhandled(&self) -> bool {
        self.handled == Some(false)
    }
}

fn or_root(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

/// Shared handle to a [`Context`], passed to every handler.
///
/// Handlers must drop any [`borrow`](Self::borrow) or
/// [`borrow_mut`](Self::borrow_mut) guard before calling
/// [`Next::proceed`](crate::Next::proceed) or navigating.
#[derive(Clone)]
pub struct ContextHandle(Rc<RefCell<Context>>);

impl ContextHandle {
    /// Wrap a context.
    pub fn new(context: Context) -> Self {
        Self(Rc::new(RefCell::new(context)))
    }

    /// Borrow the context.
    pub fn borrow(&self) -> Ref<'_, Context> {
        self.0.borrow()
    }

    /// Mutably borrow the context.
    pub fn borrow_mut(&self) -> RefMut<'_, Context> {
        self.0.borrow_mut()
    }

    /// Copy of the path relative to the base.
    pub fn path(&self) -> String {
        self.0.borrow().path.clone()
    }

    /// Copy of the canonical path.
    pub fn canonical_path(&self) -> String {
        self.0.borrow().canonical_path.clone()
    }

    /// Copy of one parameter.
    pub fn param(&self, key: &str) -> Option<String> {
        self.0.borrow().params.get(key).cloned()
    }

    /// The handled flag.
    pub fn handled(&self) -> Option<bool> {
        self.0.borrow().handled
    }

    /// Set the handled flag.
    pub fn set_handled(&self, handled: bool) {
        self.0.borrow_mut().handled = Some(handled);
    }

    /// Current dispatch phase.
    pub fn phase(&self) -> NavigationPhase {
        self.0.borrow().phase
    }

    pub(crate) fn set_phase(&self, phase: NavigationPhase) {
        self.0.borrow_mut().phase = phase;
    }

    /// Clone the context out of the handle.
    pub fn snapshot(&self) -> Context {
        self.0.borrow().clone()
    }

    /// `true` if both handles refer to the same navigation.
    pub fn ptr_eq(&self, other: &ContextHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ContextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(context) => f.debug_tuple("ContextHandle").field(&*context).finish(),
            Err(_) => f.write_str("ContextHandle(<borrowed>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PLAIN: PathConfig<'static> = PathConfig {
        base: "",
        hashbang: false,
        decode_url_components: true,
    };

    fn with_base(base: &str) -> PathConfig<'_> {
        PathConfig { base, ..PLAIN }
    }

    #[test]
    fn test_plain_path() {
        let ctx = Context::new("/user/5", None, "Home", PLAIN);
        assert_eq!(ctx.canonical_path, "/user/5");
        assert_eq!(ctx.path, "/user/5");
        assert_eq!(ctx.pathname, "/user/5");
        assert_eq!(ctx.querystring, "");
        assert_eq!(ctx.hash, "");
        assert_eq!(ctx.title, "Home");
        assert!(ctx.params.is_empty());
        assert_eq!(ctx.handled, None);
        assert_eq!(ctx.phase(), NavigationPhase::Idle);
    }

    #[test]
    fn test_base_is_prepended_and_stripped() {
        let ctx = Context::new("/post/hello-world", None, "", with_base("/blog"));
        assert_eq!(ctx.canonical_path, "/blog/post/hello-world");
        assert_eq!(ctx.path, "/post/hello-world");
        assert_eq!(ctx.pathname, "/post/hello-world");

        let ctx = Context::new("/blog/post/hello-world", None, "", with_base("/blog"));
        assert_eq!(ctx.canonical_path, "/blog/post/hello-world");
        assert_eq!(ctx.pathname, "/post/hello-world");
    }

    #[test]
    fn test_base_root_defaults_to_slash() {
        let ctx = Context::new("/blog", None, "", with_base("/blog"));
        assert_eq!(ctx.canonical_path, "/blog");
        assert_eq!(ctx.path, "/");
    }

    #[test]
    fn test_query_and_fragment_split() {
        let ctx = Context::new("/a/b?x=1&y=two#frag", None, "", PLAIN);
        assert_eq!(ctx.path, "/a/b?x=1&y=two");
        assert_eq!(ctx.pathname, "/a/b");
        assert_eq!(ctx.querystring, "x=1&y=two");
        assert_eq!(ctx.hash, "frag");
        assert_eq!(ctx.query().get_as::<u32>("x"), Some(1));
    }

    #[test]
    fn test_decoding_policy() {
        let ctx = Context::new("/caf%C3%A9?q=a+b", None, "", PLAIN);
        assert_eq!(ctx.pathname, "/café");
        assert_eq!(ctx.querystring, "q=a b");
        assert_eq!(ctx.query().get("q"), Some(&"a b".to_string()));

        let raw = PathConfig {
            decode_url_components: false,
            ..PLAIN
        };
        let ctx = Context::new("/caf%C3%A9?q=a+b", None, "", raw);
        assert_eq!(ctx.pathname, "/caf%C3%A9");
        assert_eq!(ctx.querystring, "q=a+b");
    }

    #[test]
    fn test_hashbang_with_base() {
        let config = PathConfig {
            base: "/app",
            hashbang: true,
            decode_url_components: true,
        };
        let ctx = Context::new("/inbox#x", None, "", config);
        assert_eq!(ctx.canonical_path, "/app#!/inbox#x");
        assert_eq!(ctx.path, "/inbox#x");
        assert_eq!(ctx.hash, "");
    }

    #[test]
    fn test_hashbang_without_base() {
        let config = PathConfig {
            hashbang: true,
            ..PLAIN
        };
        let ctx = Context::new("/inbox", None, "", config);
        assert_eq!(ctx.canonical_path, "/inbox");
        assert_eq!(ctx.path, "/inbox");
    }

    #[test]
    fn test_state_receives_path() {
        let mut state = State::new();
        state.insert("scroll".to_string(), json!(120));

        let ctx = Context::new("/post/1", Some(state), "", with_base("/blog"));
        assert_eq!(ctx.state["scroll"], json!(120));
        assert_eq!(ctx.state["path"], json!("/blog/post/1"));

        let ctx = Context::new("/post/1", None, "", PLAIN);
        assert_eq!(ctx.state.len(), 1);
    }

    #[test]
    fn test_relative_path_is_not_prefixed() {
        let ctx = Context::new("", None, "", with_base("/blog"));
        assert_eq!(ctx.canonical_path, "");
        assert_eq!(ctx.path, "/");
    }

    #[test]
    fn test_handle_accessors() {
        let handle = ContextHandle::new(Context::new("/user/5", None, "", PLAIN));
        handle
            .borrow_mut()
            .params
            .insert("id".to_string(), "5".to_string());
        assert_eq!(handle.param("id"), Some("5".to_string()));

        handle.set_handled(true);
        assert_eq!(handle.handled(), Some(true));
        assert!(handle.ptr_eq(&handle.clone()));
        assert_eq!(handle.snapshot().path, "/user/5");
    }
}
