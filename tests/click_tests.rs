//! Integration tests for link click interception

mod common;

use common::*;
use spa_navigator::*;
use std::rc::Rc;

fn link(href: &str) -> Rc<Element> {
    Rc::new(Element::anchor(href))
}

fn clicking(target: Rc<Element>) -> ClickEvent {
    ClickEvent::on(target)
}

fn started(url: &str) -> (Router, MemoryHost, Calls) {
    let (router, host) = setup_at(url);
    let calls = Calls::new();
    router.route("*", calls.path("show")).unwrap();
    start_quiet(&router);
    (router, host, calls)
}

// ---- accepted clicks ----

#[test]
fn test_same_origin_link_is_intercepted() {
    let (router, host, calls) = started("http://localhost/");

    let mut event = clicking(link("/about?tab=team"));
    assert!(host.click(&mut event));
    assert_eq!(calls.take(), vec!["show:/about?tab=team"]);
    assert_eq!(router.history_len(), 1);
    assert_eq!(host.current_url(), "http://localhost/about?tab=team");
}

#[test]
fn test_relative_and_absolute_hrefs() {
    let (_router, host, calls) = started("http://localhost/docs/intro");

    assert!(host.click(&mut clicking(link("setup"))));
    assert!(host.click(&mut clicking(link("http://localhost/faq"))));
    assert_eq!(calls.take(), vec!["show:/docs/setup", "show:/faq"]);
}

#[test]
fn test_click_inside_link_finds_anchor() {
    let (_router, host, calls) = started("http://localhost/");

    let anchor = link("/nested");
    let icon = Rc::new(Element::new("SPAN").child_of(Rc::clone(&anchor)));
    assert!(host.click(&mut clicking(icon)));
    assert_eq!(calls.take(), vec!["show:/nested"]);
}

#[test]
fn test_composed_path_is_preferred() {
    let (_router, host, calls) = started("http://localhost/");

    let inner = Rc::new(Element::new("slot"));
    let mut event = clicking(Rc::clone(&inner));
    event.composed_path = Some(vec![inner, link("/shadow")]);
    assert!(host.click(&mut event));
    assert_eq!(calls.take(), vec!["show:/shadow"]);
}

#[test]
fn test_svg_link_uses_base_val() {
    let (_router, host, calls) = started("http://localhost/");

    let mut event = clicking(Rc::new(Element::svg_anchor("chart/2024")));
    assert!(host.click(&mut event));
    assert_eq!(calls.take(), vec!["show:/chart/2024"]);
}

#[test]
fn test_link_inside_base() {
    let (router, host) = setup();
    let calls = Calls::new();
    router.set_base("/blog");
    router.route("/post/:slug", calls.path("post")).unwrap();
    start_quiet(&router);

    assert!(host.click(&mut clicking(link("/blog/post/hello"))));
    assert_eq!(calls.take(), vec!["post:/post/hello"]);
}

#[test]
fn test_desktop_shell_drive_letter_is_stripped() {
    let (_router, host, calls) = started("file:///C:/app/index.html");
    host.set_desktop_shell(true);

    assert!(host.click(&mut clicking(link("file:///C:/settings"))));
    assert_eq!(calls.take(), vec!["show:/settings"]);
}

#[test]
fn test_fragment_link_in_hashbang_mode_is_intercepted() {
    let (router, host) = setup_at("http://localhost/");
    router.route("*", |_: &ContextHandle, _: Next| {}).unwrap();
    router.start(Options::new().hashbang(true).dispatch(false));

    assert!(host.click(&mut clicking(link("#!/inbox"))));
}

// ---- rejected clicks ----

#[test]
fn test_cross_origin_link_is_ignored() {
    let (router, host, calls) = started("http://localhost/");

    let mut event = clicking(link("http://example.com/about"));
    assert!(!host.click(&mut event));
    assert!(calls.snapshot().is_empty());
    assert_eq!(router.history_len(), 0);

    assert!(!host.click(&mut clicking(link("https://localhost/about"))));
    assert!(!host.click(&mut clicking(link("http://localhost:8080/about"))));
    assert!(calls.snapshot().is_empty());
}

#[test]
fn test_non_primary_and_modified_clicks_are_ignored() {
    let (_router, host, calls) = started("http://localhost/");

    let mut middle = clicking(link("/a"));
    middle.which = Some(2);
    assert!(!host.click(&mut middle));

    for modifier in 0..3 {
        let mut event = clicking(link("/a"));
        match modifier {
            0 => event.meta_key = true,
            1 => event.ctrl_key = true,
            _ => event.shift_key = true,
        }
        assert!(!host.click(&mut event));
    }

    let mut handled = clicking(link("/a"));
    handled.default_prevented = true;
    host.click(&mut handled);

    assert!(calls.snapshot().is_empty());
}

#[test]
fn test_button_is_used_without_which() {
    let (_router, host, calls) = started("http://localhost/");

    let mut event = clicking(link("/a"));
    event.which = None;
    event.button = 1;
    assert!(host.click(&mut event));
    assert_eq!(calls.take(), vec!["show:/a"]);
}

#[test]
fn test_link_attributes_opt_out() {
    let (_router, host, calls) = started("http://localhost/");

    let opt_outs = [
        Element::anchor("/report.pdf").attr("download", ""),
        Element::anchor("/partner").attr("rel", "external"),
        Element::anchor("/popup").attr("target", "_blank"),
        Element::anchor("mailto:team@example.com"),
        Element::svg_anchor("/chart").attr("target", "_top"),
    ];
    for anchor in opt_outs {
        assert!(!host.click(&mut clicking(Rc::new(anchor))));
    }
    assert!(calls.snapshot().is_empty());
}

#[test]
fn test_empty_target_attribute_is_allowed() {
    let (_router, host, calls) = started("http://localhost/");

    assert!(host.click(&mut clicking(Rc::new(
        Element::anchor("/here").attr("target", "")
    ))));
    assert_eq!(calls.take(), vec!["show:/here"]);
}

#[test]
fn test_fragment_only_change_is_ignored() {
    let (_router, host, calls) = started("http://localhost/page?x=1");

    assert!(!host.click(&mut clicking(link("#section"))));
    assert!(!host.click(&mut clicking(link("#"))));
    assert!(!host.click(&mut clicking(link("/page?x=1#top"))));
    assert!(calls.snapshot().is_empty());

    assert!(host.click(&mut clicking(link("/page?x=2#top"))));
    assert_eq!(calls.take(), vec!["show:/page?x=2"]);
}

#[test]
fn test_link_outside_base_is_ignored() {
    let (router, host) = setup();
    let calls = Calls::new();
    router.set_base("/blog");
    router.route("*", calls.path("show")).unwrap();
    start_quiet(&router);

    assert!(!host.click(&mut clicking(link("/shop/cart"))));
    assert!(calls.snapshot().is_empty());
}

#[test]
fn test_no_anchor_is_ignored() {
    let (_router, host, calls) = started("http://localhost/");

    let button = Rc::new(Element::new("BUTTON").child_of(Rc::new(Element::new("BODY"))));
    assert!(!host.click(&mut clicking(button)));
    assert!(calls.snapshot().is_empty());
}

// ---- binding ----

#[test]
fn test_click_binding_can_be_disabled() {
    let (router, host) = setup();
    router.start(Options::new().click(false).dispatch(false));
    assert!(!host.is_click_bound());
    assert!(!host.click(&mut clicking(link("/a"))));
}

#[test]
fn test_stopped_router_does_not_intercept() {
    let (router, host) = setup();
    let calls = Calls::new();
    router.route("*", calls.path("show")).unwrap();
    router.start(Options::new());
    router.stop();
    calls.take();

    assert!(!host.click(&mut clicking(link("/a"))));
    assert!(calls.snapshot().is_empty());
}

#[test]
fn test_router_can_be_driven_directly() {
    let (router, _host) = setup();
    let calls = Calls::new();
    router.route("*", calls.path("show")).unwrap();

    let mut event = clicking(link("/direct"));
    router.handle_click(&mut event);
    assert!(event.is_default_prevented());
    assert_eq!(calls.take(), vec!["show:/direct"]);
}
