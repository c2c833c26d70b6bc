//! [`Page`] over the live DOM.

use crate::page::{Page, Selector};
use anyhow::{Context, Result};
use tracing::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, FocusOptions, HtmlElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement, IntersectionObserver, Node, NodeList, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition, ScrollToOptions, Window,
};

pub(super) type ObserverCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

/// An `IntersectionObserver` together with the closure it calls back into.
/// The closure must outlive the observer.
pub(super) struct Observer {
    pub(super) inner: IntersectionObserver,
    pub(super) _callback: ObserverCallback,
}

pub struct WebPage {
    window: Window,
    document: Document,
    root: Element,
    observer: Option<Observer>,
}

impl WebPage {
    pub(super) fn new(window: Window, document: Document, observer: Option<Observer>) -> Result<Self> {
        let root = document
            .document_element()
            .context("Document has no root element")?;
        Ok(Self {
            window,
            document,
            root,
            observer,
        })
    }
}

fn collect(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Log a failed DOM call. These only fail on malformed input (an invalid
/// attribute name, say), which the behaviors never produce.
fn log_failure(op: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        debug!("DOM call {} failed: {:?}", op, err);
    }
}

impl Page for WebPage {
    type Element = Element;

    fn root(&self) -> Element {
        self.root.clone()
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query_all(&self, scope: Option<&Element>, selector: &Selector) -> Vec<Element> {
        let css = selector.to_css();
        let list = match scope {
            Some(element) => element.query_selector_all(&css),
            None => self.document.query_selector_all(&css),
        };
        match list {
            Ok(list) => collect(list),
            Err(err) => {
                debug!("Selector {} rejected: {:?}", css, err);
                Vec::new()
            }
        }
    }

    fn closest(&self, element: &Element, selector: &Selector) -> Option<Element> {
        element.closest(&selector.to_css()).ok().flatten()
    }

    fn matches(&self, element: &Element, selector: &Selector) -> bool {
        element.matches(&selector.to_css()).unwrap_or(false)
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        let node: &Node = node;
        ancestor.contains(Some(node))
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn set_attribute(&mut self, element: &Element, name: &str, value: &str) {
        log_failure("setAttribute", element.set_attribute(name, value));
    }

    fn remove_attribute(&mut self, element: &Element, name: &str) {
        log_failure("removeAttribute", element.remove_attribute(name));
    }

    fn has_class(&self, element: &Element, class: &str) -> bool {
        element.class_list().contains(class)
    }

    fn add_class(&mut self, element: &Element, class: &str) {
        log_failure("classList.add", element.class_list().add_1(class));
    }

    fn remove_class(&mut self, element: &Element, class: &str) {
        log_failure("classList.remove", element.class_list().remove_1(class));
    }

    fn set_text(&mut self, element: &Element, text: &str) {
        element.set_text_content(Some(text));
    }

    fn is_hidden(&self, element: &Element) -> bool {
        match element.dyn_ref::<HtmlElement>() {
            Some(html) => html.hidden(),
            None => element.has_attribute("hidden"),
        }
    }

    fn set_hidden(&mut self, element: &Element, hidden: bool) {
        if let Some(html) = element.dyn_ref::<HtmlElement>() {
            html.set_hidden(hidden);
        } else if hidden {
            log_failure("setAttribute", element.set_attribute("hidden", ""));
        } else {
            log_failure("removeAttribute", element.remove_attribute("hidden"));
        }
    }

    fn value(&self, element: &Element) -> Option<String> {
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            Some(input.value())
        } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
            Some(area.value())
        } else {
            element
                .dyn_ref::<HtmlSelectElement>()
                .map(HtmlSelectElement::value)
        }
    }

    fn active_element(&self) -> Option<Element> {
        self.document.active_element()
    }

    fn focus(&mut self, element: &Element, prevent_scroll: bool) -> bool {
        let Some(html) = element.dyn_ref::<HtmlElement>() else {
            return false;
        };
        let options = FocusOptions::new();
        options.set_prevent_scroll(prevent_scroll);
        log_failure("focus", html.focus_with_options(&options));
        self.document.active_element().as_ref() == Some(element)
    }

    fn scroll_into_view(&mut self, element: &Element) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        element.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn scroll_to_top(&mut self) {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn supports_intersection(&self) -> bool {
        self.observer.is_some()
    }

    fn observe(&mut self, element: &Element) {
        if let Some(observer) = &self.observer {
            observer.inner.observe(element);
        }
    }

    fn unobserve(&mut self, element: &Element) {
        if let Some(observer) = &self.observer {
            observer.inner.unobserve(element);
        }
    }
}
