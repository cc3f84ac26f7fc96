//! Link click interception.
//!
//! The host reports document-level clicks as [`ClickEvent`]s carrying a
//! lightweight [`Element`] tree. The router finds the link that was
//! activated, filters out everything the browser should handle itself, and
//! turns the rest into [`Router::show`] calls.
//!
//! A click is left alone when:
//!
//! - it is not a plain primary-button click (other button, meta/ctrl/shift
//!   held, or already default-prevented);
//! - no enclosing `<a>` exists;
//! - the link has a `download` attribute, `rel="external"`, a non-empty
//!   `target`, or a `mailto:` href;
//! - it only changes the fragment of the visible page (outside hashbang mode);
//! - it points at another origin;
//! - a base path is configured and the link lies outside it.

use crate::location::Location;
use crate::router::Router;
use crate::{debug_log, trace_log, warn_log};
use std::collections::HashMap;
use std::rc::Rc;

// ============================================================================
// Element model
// ============================================================================

/// An element's `href` property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Href {
    /// HTML anchors: a URL string, absolute or relative to the document.
    Plain(String),
    /// SVG `<a>`: an animated string whose `baseVal` is used as the path.
    Animated { base_val: String },
}

/// The parts of a DOM element the click filter reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub node_name: String,
    pub href: Option<Href>,
    pub attributes: HashMap<String, String>,
    pub parent: Option<Rc<Element>>,
}

impl Element {
    /// A bare element.
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            ..Self::default()
        }
    }

    /// An HTML `<a href=...>`.
    pub fn anchor(href: impl Into<String>) -> Self {
        let href = href.into();
        Self {
            href: Some(Href::Plain(href.clone())),
            ..Self::new("A")
        }
        .attr("href", href)
    }

    /// An SVG `<a href=...>`.
    pub fn svg_anchor(href: impl Into<String>) -> Self {
        let href = href.into();
        Self {
            href: Some(Href::Animated {
                base_val: href.clone(),
            }),
            ..Self::new("a")
        }
        .attr("href", href)
    }

    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn child_of(mut self, parent: Rc<Element>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn is_anchor(&self) -> bool {
        self.node_name.eq_ignore_ascii_case("a")
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    fn has_href(&self) -> bool {
        match &self.href {
            Some(Href::Plain(href)) => !href.is_empty(),
            Some(Href::Animated { .. }) => true,
            None => false,
        }
    }
}

// ============================================================================
// ClickEvent
// ============================================================================

/// A pointer activation delivered by the host.
#[derive(Debug, Clone, Default)]
pub struct ClickEvent {
    /// Legacy button number (1 = primary). Falls back to `button` when absent.
    pub which: Option<u16>,
    pub button: i16,
    pub meta_key: bool,
    pub ctrl_key: bool,
    pub shift_key: bool,
    pub default_prevented: bool,
    pub target: Option<Rc<Element>>,
    /// Elements the event travelled through, innermost first.
    pub composed_path: Option<Vec<Rc<Element>>>,
}

impl ClickEvent {
    /// A primary-button click on `target`.
    pub fn on(target: Rc<Element>) -> Self {
        Self {
            which: Some(1),
            target: Some(target),
            ..Self::default()
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn which(&self) -> i32 {
        self.which.map_or(i32::from(self.button), i32::from)
    }

    fn is_modified(&self) -> bool {
        self.meta_key || self.ctrl_key || self.shift_key
    }

    /// The activated link: the first anchor with an href on the composed
    /// path, else the nearest anchor ancestor of the target.
    fn link(&self) -> Option<Rc<Element>> {
        let from_path = self
            .composed_path
            .iter()
            .flatten()
            .find(|el| el.is_anchor() && el.has_href())
            .cloned();

        let mut el = from_path.or_else(|| self.target.clone());
        while let Some(current) = el {
            if current.is_anchor() {
                return Some(current);
            }
            el = current.parent.clone();
        }
        None
    }
}

// ============================================================================
// Interception
// ============================================================================

impl Router {
    /// Filter a click and navigate if it activated an in-app link.
    pub fn handle_click(&self, event: &mut ClickEvent) {
        if event.which() != 1 || event.is_modified() || event.is_default_prevented() {
            return;
        }
        let Some(link) = event.link() else {
            return;
        };
        if link.has_attribute("download") || link.attribute("rel") == Some("external") {
            trace_log!("click ignored: download or external link");
            return;
        }

        let raw = link.attribute("href");
        if is_mailto(raw) || has_target(&link) {
            trace_log!("click ignored: mailto or targeted link");
            return;
        }

        let location = self.location();
        let hashbang = self.state().hashbang;
        let path = match &link.href {
            Some(Href::Animated { base_val }) => base_val.clone(),
            Some(Href::Plain(href)) => {
                let Some(target) = resolve(&location, href) else {
                    return;
                };
                if !hashbang
                    && target.same_path(&location)
                    && (!target.hash.is_empty() || raw == Some("#"))
                {
                    trace_log!("click ignored: fragment change");
                    return;
                }
                if !location.same_origin(&target) {
                    trace_log!("click ignored: cross-origin '{}'", href);
                    return;
                }
                target.path()
            }
            None => return,
        };
        let mut path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        if self.host().is_desktop_shell() && has_drive_letter(&path) {
            path = path[3..].to_string();
        }

        let orig = path.clone();
        let base = self.effective_base();
        if let Some(stripped) = path.strip_prefix(base.as_str()) {
            path = stripped.to_string();
        }
        if hashbang {
            path = path.replacen("#!", "", 1);
        }
        if !base.is_empty() && orig == path && !location.is_file() {
            trace_log!("click ignored: '{}' outside base '{}'", orig, base);
            return;
        }

        debug_log!("click -> '{}'", orig);
        event.prevent_default();
        self.show(&orig);
    }
}

fn resolve(location: &Location, href: &str) -> Option<Location> {
    if href.is_empty() {
        return None;
    }
    match location.resolve(href) {
        Ok(target) => Some(target),
        Err(err) => {
            warn_log!("click ignored: {}", err);
            None
        }
    }
}

fn is_mailto(href: Option<&str>) -> bool {
    href.is_some_and(|href| href.contains("mailto:"))
}

fn has_target(link: &Element) -> bool {
    link.attribute("target").is_some_and(|target| !target.is_empty())
}

/// `/C:/...`, as reported by packaged desktop shells.
fn has_drive_letter(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 4
        && bytes[0] == b'/'
        && bytes[1].is_ascii_alphabetic()
        && bytes[2] == b':'
        && bytes[3] == b'/'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_which_falls_back_to_button() {
        let mut event = ClickEvent::default();
        assert_eq!(event.which(), 0);
        event.which = Some(2);
        assert_eq!(event.which(), 2);
    }

    #[test]
    fn test_link_from_ancestors() {
        let anchor = Rc::new(Element::anchor("/docs"));
        let span = Rc::new(Element::new("SPAN").child_of(Rc::clone(&anchor)));
        let event = ClickEvent::on(span);
        assert_eq!(event.link(), Some(anchor));
    }

    #[test]
    fn test_link_from_composed_path() {
        let inner = Rc::new(Element::anchor("/inner"));
        let span = Rc::new(Element::new("span"));
        let mut event = ClickEvent::on(Rc::clone(&span));
        event.composed_path = Some(vec![span, Rc::clone(&inner)]);
        assert_eq!(event.link(), Some(inner));
    }

    #[test]
    fn test_no_link() {
        let div = Rc::new(Element::new("DIV").child_of(Rc::new(Element::new("BODY"))));
        assert_eq!(ClickEvent::on(div).link(), None);
    }

    #[test]
    fn test_drive_letter() {
        assert!(has_drive_letter("/C:/app/index.html"));
        assert!(has_drive_letter("/z:/x"));
        assert!(!has_drive_letter("/CC:/x"));
        assert!(!has_drive_letter("/C:"));
    }
}
