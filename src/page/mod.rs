//! # Page Abstraction
//!
//! The controllers in [`crate::ui`] never touch a browser API directly. They
//! talk to a [`Page`], which exposes just the document operations the
//! portfolio behaviors need: lookups, attributes and classes, focus, and
//! viewport scrolling.
//!
//! ## Backends
//!
//! - [`MemoryPage`] - an in-memory element tree used by tests and headless
//!   hosts
//! - `web::WebPage` - the `web_sys` implementation (wasm32 only)
//!
//! Elements are opaque handles (`Page::Element`). Two handles compare equal
//! iff they refer to the same element.

mod event;
mod memory;
mod selector;

pub use event::{Key, Outcome, PageEvent};
pub use memory::{MemoryPage, NodeId};
pub use selector::Selector;

use std::fmt::Debug;

/// Document operations used by the controllers.
pub trait Page {
    type Element: Clone + PartialEq + Debug;

    /// The document root (`<html>`).
    fn root(&self) -> Self::Element;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// All elements matching `selector`, in document order. With a `scope`,
    /// only descendants of that element are considered.
    fn query_all(&self, scope: Option<&Self::Element>, selector: &Selector) -> Vec<Self::Element>;

    fn query(&self, scope: Option<&Self::Element>, selector: &Selector) -> Option<Self::Element> {
        self.query_all(scope, selector).into_iter().next()
    }

    /// Nearest inclusive ancestor of `element` matching `selector`.
    fn closest(&self, element: &Self::Element, selector: &Selector) -> Option<Self::Element>;

    fn matches(&self, element: &Self::Element, selector: &Selector) -> bool;

    /// True if `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: &Self::Element, node: &Self::Element) -> bool;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;
    fn set_attribute(&mut self, element: &Self::Element, name: &str, value: &str);
    fn remove_attribute(&mut self, element: &Self::Element, name: &str);

    fn has_attribute(&self, element: &Self::Element, name: &str) -> bool {
        self.attribute(element, name).is_some()
    }

    fn has_class(&self, element: &Self::Element, class: &str) -> bool;
    fn add_class(&mut self, element: &Self::Element, class: &str);
    fn remove_class(&mut self, element: &Self::Element, class: &str);

    /// Flip `class` and return whether it is now present.
    fn toggle_class(&mut self, element: &Self::Element, class: &str) -> bool {
        if self.has_class(element, class) {
            self.remove_class(element, class);
            false
        } else {
            self.add_class(element, class);
            true
        }
    }

    /// Add `class` when `on`, remove it otherwise.
    fn set_class(&mut self, element: &Self::Element, class: &str, on: bool) {
        if on {
            self.add_class(element, class);
        } else {
            self.remove_class(element, class);
        }
    }

    fn set_text(&mut self, element: &Self::Element, text: &str);

    fn is_hidden(&self, element: &Self::Element) -> bool;
    fn set_hidden(&mut self, element: &Self::Element, hidden: bool);

    /// Current value of a form control, `None` for anything else.
    fn value(&self, element: &Self::Element) -> Option<String>;

    fn active_element(&self) -> Option<Self::Element>;

    /// Move keyboard focus. Returns `false` when the element cannot take
    /// focus, in which case focus is left where it was.
    fn focus(&mut self, element: &Self::Element, prevent_scroll: bool) -> bool;

    /// Smoothly bring `element` to the top of the viewport.
    fn scroll_into_view(&mut self, element: &Self::Element);

    /// Smoothly scroll the viewport back to the origin.
    fn scroll_to_top(&mut self);

    /// Whether viewport-intersection observation is available.
    fn supports_intersection(&self) -> bool;

    fn observe(&mut self, element: &Self::Element);
    fn unobserve(&mut self, element: &Self::Element);
}
