//! Browser host over `web-sys` (feature `web`).
//!
//! History frames store the router's state as a plain JS object built from
//! its JSON form, so frames written by this host survive reloads and can be
//! read by other scripts.

use crate::click::{ClickEvent, Element, Href};
use crate::context::State;
use crate::host::{ClickListener, Host, PopStateEvent, PopStateListener, Task};
use crate::location::Location;
use crate::{error_log, warn_log};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Event, EventTarget, Window};

type Listener = Closure<dyn FnMut(Event)>;

/// [`Host`] backed by the browser window.
pub struct WebHost {
    window: Window,
    desktop_shell: bool,
    click: RefCell<Option<Listener>>,
    popstate: RefCell<Option<Listener>>,
}

impl WebHost {
    /// Bind to the global window. Returns `None` outside a browser.
    pub fn new() -> Option<Self> {
        web_sys::window().map(Self::from_window)
    }

    pub fn from_window(window: Window) -> Self {
        Self {
            window,
            desktop_shell: false,
            click: RefCell::new(None),
            popstate: RefCell::new(None),
        }
    }

    /// Strip `/C:/` style drive letters from clicked paths, for apps packaged
    /// in a desktop shell that serves them from the file system.
    #[must_use]
    pub fn desktop_shell(mut self, desktop_shell: bool) -> Self {
        self.desktop_shell = desktop_shell;
        self
    }

    fn document(&self) -> Option<Document> {
        self.window.document()
    }

    fn history(&self, action: &str, run: impl FnOnce(&web_sys::History) -> Result<(), JsValue>) {
        let result = self.window.history().and_then(|history| run(&history));
        if let Err(err) = result {
            error_log!("history.{} failed: {:?}", action, err);
        }
    }

    fn listen(
        &self,
        slot: &RefCell<Option<Listener>>,
        target: Option<EventTarget>,
        kind: &str,
        listener: Listener,
    ) {
        self.unlisten(slot, target.clone(), kind);
        let Some(target) = target else {
            return;
        };
        if let Err(err) =
            target.add_event_listener_with_callback(kind, listener.as_ref().unchecked_ref())
        {
            error_log!("addEventListener('{}') failed: {:?}", kind, err);
            return;
        }
        *slot.borrow_mut() = Some(listener);
    }

    fn unlisten(&self, slot: &RefCell<Option<Listener>>, target: Option<EventTarget>, kind: &str) {
        let Some(listener) = slot.borrow_mut().take() else {
            return;
        };
        if let Some(target) = target {
            // The closure is dropped either way.
            let _ = target
                .remove_event_listener_with_callback(kind, listener.as_ref().unchecked_ref());
        }
    }
}

impl Host for WebHost {
    fn location(&self) -> Location {
        match self.window.location().href() {
            Ok(href) => Location::parse(&href).unwrap_or_else(|err| {
                warn_log!("{}", err);
                Location::default()
            }),
            Err(err) => {
                error_log!("location.href unavailable: {:?}", err);
                Location::default()
            }
        }
    }

    fn title(&self) -> String {
        self.document().map(|doc| doc.title()).unwrap_or_default()
    }

    fn push_state(&self, state: &State, title: &str, url: &str) {
        let state = to_js(state);
        self.history("pushState", |history| {
            history.push_state_with_url(&state, title, Some(url))
        });
    }

    fn replace_state(&self, state: &State, title: &str, url: &str) {
        let state = to_js(state);
        self.history("replaceState", |history| {
            history.replace_state_with_url(&state, title, Some(url))
        });
    }

    fn back(&self) {
        self.history("back", |history| history.back());
    }

    fn assign(&self, url: &str) {
        if let Err(err) = self.window.location().assign(url) {
            error_log!("location.assign('{}') failed: {:?}", url, err);
        }
    }

    fn is_loaded(&self) -> bool {
        self.document()
            .is_some_and(|doc| doc.ready_state() == "complete")
    }

    fn defer(&self, task: Task) {
        let callback = Closure::once_into_js(task);
        if let Err(err) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 0)
        {
            error_log!("setTimeout failed: {:?}", err);
        }
    }

    fn is_desktop_shell(&self) -> bool {
        self.desktop_shell
    }

    fn bind_click(&self, listener: ClickListener) {
        let closure = Closure::wrap(Box::new(move |event: Event| {
            let Some(mouse) = event.dyn_ref::<web_sys::MouseEvent>() else {
                return;
            };
            let mut click = to_click(mouse);
            listener(&mut click);
            if click.is_default_prevented() && !event.default_prevented() {
                event.prevent_default();
            }
        }) as Box<dyn FnMut(Event)>);
        let target = self.document().map(EventTarget::from);
        self.listen(&self.click, target, "click", closure);
    }

    fn unbind_click(&self) {
        let target = self.document().map(EventTarget::from);
        self.unlisten(&self.click, target, "click");
    }

    fn bind_popstate(&self, listener: PopStateListener) {
        let closure = Closure::wrap(Box::new(move |event: Event| {
            let state = event
                .dyn_ref::<web_sys::PopStateEvent>()
                .and_then(|event| from_js(&event.state()));
            listener(&PopStateEvent { state });
        }) as Box<dyn FnMut(Event)>);
        let target = Some(EventTarget::from(self.window.clone()));
        self.listen(&self.popstate, target, "popstate", closure);
    }

    fn unbind_popstate(&self) {
        let target = Some(EventTarget::from(self.window.clone()));
        self.unlisten(&self.popstate, target, "popstate");
    }
}

impl Drop for WebHost {
    fn drop(&mut self) {
        self.unbind_click();
        self.unbind_popstate();
    }
}

fn to_js(state: &State) -> JsValue {
    let json = serde_json::Value::Object(state.clone()).to_string();
    js_sys::JSON::parse(&json).unwrap_or_else(|err| {
        warn_log!("history state not serialisable: {:?}", err);
        JsValue::NULL
    })
}

fn from_js(value: &JsValue) -> Option<State> {
    if value.is_null() || value.is_undefined() {
        return None;
    }
    let json: String = js_sys::JSON::stringify(value).ok()?.into();
    match serde_json::from_str(&json) {
        Ok(state) => Some(state),
        Err(err) => {
            warn_log!("history state is not an object: {}", err);
            None
        }
    }
}

fn to_click(event: &web_sys::MouseEvent) -> ClickEvent {
    let composed_path = event
        .composed_path()
        .iter()
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .map(|el| Rc::new(to_element(&el, false)))
        .collect();
    let target = event
        .target()
        .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
        .map(|el| Rc::new(to_element(&el, true)));

    ClickEvent {
        which: u16::try_from(i32::from(event.button()) + 1).ok(),
        button: event.button(),
        meta_key: event.meta_key(),
        ctrl_key: event.ctrl_key(),
        shift_key: event.shift_key(),
        default_prevented: event.default_prevented(),
        target,
        composed_path: Some(composed_path),
    }
}

const ATTRIBUTES: [&str; 4] = ["href", "download", "rel", "target"];

fn to_element(el: &web_sys::Element, with_ancestors: bool) -> Element {
    let href = if let Some(anchor) = el.dyn_ref::<web_sys::HtmlAnchorElement>() {
        Some(Href::Plain(anchor.href()))
    } else {
        el.dyn_ref::<web_sys::SvgaElement>().map(|anchor| Href::Animated {
            base_val: anchor.href().base_val(),
        })
    };

    let mut element = Element::new(el.node_name());
    element.href = href;
    for name in ATTRIBUTES {
        if let Some(value) = el.get_attribute(name) {
            element.attributes.insert(name.to_string(), value);
        }
    }
    if with_ancestors {
        element.parent = el
            .parent_element()
            .map(|parent| Rc::new(to_element(&parent, true)));
    }
    element
}
