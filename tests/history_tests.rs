//! Integration tests for history synchronisation and router lifecycle

mod common;

use common::*;
use serde_json::json;
use spa_navigator::*;

fn recording_router(calls: &Calls) -> (Router, MemoryHost) {
    let (router, host) = setup();
    router.route("*", calls.path("any")).unwrap();
    (router, host)
}

// ---- push / replace ----

#[test]
fn test_show_pushes_frames() {
    let calls = Calls::new();
    let (router, host) = recording_router(&calls);
    router.start(Options::new());

    router.show("/a");
    router.show("/b");
    assert_eq!(router.history_len(), 2);
    assert_eq!(host.history_len(), 3);
    assert_eq!(
        host.current_state().unwrap().get("path"),
        Some(&json!("/b"))
    );
}

#[test]
fn test_replace_never_grows_counter() {
    let calls = Calls::new();
    let (router, host) = recording_router(&calls);
    router.start(Options::new());

    router.replace("/a");
    router.replace("/a");
    assert_eq!(router.history_len(), 0);
    assert_eq!(host.history_len(), 1);
    assert_eq!(host.current_url(), "http://localhost/a");
    assert_eq!(calls.take(), vec!["any:/", "any:/a", "any:/a"]);
}

#[test]
fn test_title_is_stored_with_frame() {
    let calls = Calls::new();
    let (router, host) = recording_router(&calls);
    start_quiet(&router);
    host.set_title("Inbox");

    let ctx = router.show("/inbox");
    assert_eq!(ctx.borrow().title, "Inbox");
    assert_eq!(host.current_title(), "Inbox");
}

#[test]
fn test_save_from_handler_rewrites_frame() {
    let (router, host) = setup();
    router
        .route("/", |ctx: &ContextHandle, next: Next| {
            ctx.borrow_mut()
                .state
                .insert("cached".to_string(), json!([1, 2, 3]));
            next.router().save(&ctx.borrow());
        })
        .unwrap();
    router.start(Options::new());

    let state = host.current_state().unwrap();
    assert_eq!(state.get("cached"), Some(&json!([1, 2, 3])));
    assert_eq!(state.get("path"), Some(&json!("/")));
}

// ---- popstate ----

#[test]
fn test_popstate_round_trip() {
    let calls = Calls::new();
    let (router, host) = recording_router(&calls);
    start_quiet(&router);

    let first = router.show_with(
        "/a",
        NavigateOptions::new().state(state(&[("scroll", json!(120))])),
    );
    let stored = host.current_state();
    router.show("/b");

    host.pop(stored);
    let replayed = router.previous().unwrap();
    assert_eq!(replayed.path(), first.path());
    assert_eq!(replayed.borrow().state, first.borrow().state);
    assert_eq!(router.history_len(), 2);
    assert_eq!(calls.take(), vec!["any:/a", "any:/b", "any:/a"]);
}

#[test]
fn test_popstate_without_state_shows_location() {
    let calls = Calls::new();
    let (router, host) = recording_router(&calls);
    start_quiet(&router);

    host.set_url("/direct?x=1").unwrap();
    host.pop(None);
    assert_eq!(calls.take(), vec!["any:/direct?x=1"]);
    assert_eq!(router.history_len(), 0);
    assert_eq!(host.history_len(), 1);
}

#[test]
fn test_popstate_ignored_before_load() {
    let calls = Calls::new();
    let (router, host) = recording_router(&calls);
    start_quiet(&router);
    host.set_loaded(false);

    host.pop(Some(state(&[("path", json!("/early"))])));
    assert!(calls.snapshot().is_empty());
}

#[test]
fn test_popstate_listener_optional() {
    let (router, host) = setup();
    router.start(Options::new().popstate(false).dispatch(false));
    assert!(!host.is_popstate_bound());
    assert!(host.is_click_bound());
}

// ---- back ----

#[test]
fn test_back_traverses_native_history() {
    let calls = Calls::new();
    let (router, host) = recording_router(&calls);
    router.start(Options::new());
    router.show("/a");
    router.show("/b");
    calls.take();

    router.back(None, None);
    assert_eq!(router.history_len(), 1);
    assert_eq!(host.current_url(), "http://localhost/a");
    assert!(calls.snapshot().is_empty());

    assert_eq!(host.run_pending(), 1);
    assert_eq!(calls.take(), vec!["any:/a"]);
    assert_eq!(host.history_len(), 3);
    assert_eq!(router.current(), "/a");
}

#[test]
fn test_back_without_history_uses_fallback() {
    let calls = Calls::new();
    let (router, host) = recording_router(&calls);
    start_quiet(&router);

    router.back(Some("/home"), Some(state(&[("from", json!("back"))])));
    assert!(calls.snapshot().is_empty());
    assert_eq!(host.pending(), 1);

    host.run_pending();
    assert_eq!(calls.take(), vec!["any:/home"]);
    assert_eq!(router.history_len(), 1);
    assert_eq!(host.current_state().unwrap().get("from"), Some(&json!("back")));
}

#[test]
fn test_back_without_fallback_uses_base() {
    let calls = Calls::new();
    let (router, host) = recording_router(&calls);
    router.set_base("/app");
    start_quiet(&router);

    router.back(None, None);
    host.run_pending();
    assert_eq!(calls.take(), vec!["any:/"]);
    assert_eq!(host.current_url(), "http://localhost/app");
}

// ---- redirect ----

#[test]
fn test_redirect_is_deferred() {
    let (router, host) = setup();
    let calls = Calls::new();
    router.redirect("/old", "/new").unwrap();
    router.route("/new", calls.path("enter")).unwrap();
    start_quiet(&router);

    router.show("/old");
    assert!(calls.snapshot().is_empty());
    assert_eq!(host.current_url(), "http://localhost/old");

    host.run_pending();
    assert_eq!(calls.take(), vec!["enter:/new"]);
    assert_eq!(host.current_url(), "http://localhost/new");
    assert_eq!(host.history_len(), 2);
    assert_eq!(router.history_len(), 1);
}

#[test]
fn test_redirect_to_replaces_on_next_turn() {
    let calls = Calls::new();
    let (router, host) = recording_router(&calls);
    start_quiet(&router);

    router.redirect_to("/login");
    assert_eq!(router.current(), "");
    host.run_pending();
    assert_eq!(calls.take(), vec!["any:/login"]);
    assert_eq!(host.history_len(), 1);
}

// ---- lifecycle ----

#[test]
fn test_start_dispatches_current_location() {
    let calls = Calls::new();
    let (router, host) = setup_at("http://localhost/inbox?x=1#top");
    router.route("*", calls.path("any")).unwrap();
    router.start(Options::new());

    assert!(router.is_running());
    assert_eq!(calls.take(), vec!["any:/inbox?x=1"]);
    let ctx = router.previous().unwrap();
    assert!(ctx.borrow().init);
    assert_eq!(ctx.borrow().hash, "top");
    assert_eq!(host.history_len(), 1);
    assert_eq!(host.current_url(), "http://localhost/inbox?x=1#top");
}

#[test]
fn test_start_without_dispatch() {
    let calls = Calls::new();
    let (router, host) = recording_router(&calls);
    start_quiet(&router);

    assert!(!router.is_running());
    assert!(calls.snapshot().is_empty());
    assert!(host.is_click_bound());
    assert!(host.is_popstate_bound());
}

#[test]
fn test_stop_detaches_and_resets() {
    let calls = Calls::new();
    let (router, host) = recording_router(&calls);
    router.start(Options::new());
    router.show("/a");

    router.stop();
    assert!(!router.is_running());
    assert_eq!(router.current(), "");
    assert_eq!(router.history_len(), 0);
    assert!(!host.is_click_bound());
    assert!(!host.is_popstate_bound());
}

#[test]
fn test_decoding_can_be_disabled() {
    let (router, _host) = setup();
    router
        .route("/tag/:name", |_: &ContextHandle, _: Next| {})
        .unwrap();
    router.start(Options::new().dispatch(false).decode_url_components(false));

    let ctx = router.show("/tag/a%20b?q=x+y");
    let ctx = ctx.borrow();
    assert_eq!(ctx.params.get("name").map(String::as_str), Some("a%20b"));
    assert_eq!(ctx.querystring, "q=x+y");
}

// ---- hashbang ----

#[test]
fn test_hashbang_start_and_show() {
    let calls = Calls::new();
    let (router, host) = setup_at("http://localhost/#!/inbox");
    router.route("*", calls.path("any")).unwrap();
    router.start(Options::new().hashbang(true));

    assert_eq!(calls.take(), vec!["any:/inbox"]);
    assert_eq!(host.current_url(), "http://localhost/#!/inbox");

    router.show("/sent");
    assert_eq!(host.current_url(), "http://localhost/#!/sent");

    router.show("/");
    assert_eq!(host.current_url(), "http://localhost/");
}

#[test]
fn test_hashbang_on_file_location_uses_document_as_base() {
    let calls = Calls::new();
    let (router, host) = setup_at("file:///C:/app/index.html#!/settings");
    router.route("*", calls.path("any")).unwrap();
    router.start(Options::new().hashbang(true));

    assert_eq!(calls.take(), vec!["any:/settings"]);
    let ctx = router.previous().unwrap();
    assert_eq!(ctx.canonical_path(), "/C:/app/index.html#!/settings");
    assert_eq!(host.current_url(), "file:///C:/app/index.html#!/settings");
}
