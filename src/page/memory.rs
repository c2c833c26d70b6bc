//! In-memory [`Page`] backend.
//!
//! A flat arena of element nodes with just enough document semantics for the
//! portfolio controllers: attributes, classes, text, form values, focus,
//! the `hidden` flag, and a recorded viewport. Tests build a page with
//! [`MemoryPage::append`] and then inspect it after dispatching events.

use super::{Page, Selector};
use std::collections::{BTreeMap, BTreeSet};

const FOCUSABLE_TAGS: [&str; 5] = ["a", "button", "input", "select", "textarea"];
const FORM_CONTROL_TAGS: [&str; 3] = ["input", "select", "textarea"];

/// Handle to a node inside a [`MemoryPage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    text: String,
    value: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(tag: &str, parent: Option<NodeId>) -> Self {
        let tag = tag.to_ascii_lowercase();
        let value = FORM_CONTROL_TAGS
            .contains(&tag.as_str())
            .then(String::new);
        Self {
            tag,
            attrs: BTreeMap::new(),
            text: String::new(),
            value,
            parent,
            children: Vec::new(),
        }
    }

    fn classes(&self) -> impl Iterator<Item = &str> {
        self.attrs
            .get("class")
            .map(String::as_str)
            .unwrap_or_default()
            .split_ascii_whitespace()
    }
}

/// An element tree held entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryPage {
    nodes: Vec<Node>,
    body: NodeId,
    active: Option<NodeId>,
    scroll_offset: f64,
    scrolled_to: Option<NodeId>,
    intersection: bool,
    observed: BTreeSet<NodeId>,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPage {
    /// An empty `<html><body></body></html>` document with intersection
    /// observation available.
    pub fn new() -> Self {
        let html = Node::new("html", None);
        let body = Node::new("body", Some(NodeId(0)));
        let mut page = Self {
            nodes: vec![html, body],
            body: NodeId(1),
            active: None,
            scroll_offset: 0.0,
            scrolled_to: None,
            intersection: true,
            observed: BTreeSet::new(),
        };
        page.nodes[0].children.push(NodeId(1));
        page
    }

    /// Same as [`MemoryPage::new`] but reporting no intersection support.
    pub fn without_intersection() -> Self {
        Self {
            intersection: false,
            ..Self::new()
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Append a child element and return its handle. `attrs` may include
    /// `id` and `class` like any other attribute.
    pub fn append(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut node = Node::new(tag, Some(parent));
        for (name, value) in attrs {
            node.attrs.insert((*name).to_string(), (*value).to_string());
        }
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn text(&self, element: NodeId) -> &str {
        &self.nodes[element.0].text
    }

    /// Set a form control's value, as if the user typed it.
    pub fn set_value(&mut self, element: NodeId, value: &str) {
        self.nodes[element.0].value = Some(value.to_string());
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    pub fn set_scroll_offset(&mut self, offset: f64) {
        self.scroll_offset = offset;
    }

    /// The element most recently scrolled into view, if any.
    pub fn scrolled_to(&self) -> Option<NodeId> {
        self.scrolled_to
    }

    pub fn is_observed(&self, element: NodeId) -> bool {
        self.observed.contains(&element)
    }

    /// Class list in attribute order.
    pub fn classes(&self, element: NodeId) -> Vec<String> {
        self.nodes[element.0].classes().map(str::to_string).collect()
    }

    fn node(&self, element: NodeId) -> &Node {
        &self.nodes[element.0]
    }

    fn can_focus(&self, element: NodeId) -> bool {
        let node = self.node(element);
        if node.attrs.contains_key("disabled") || self.in_hidden_subtree(element) {
            return false;
        }
        FOCUSABLE_TAGS.contains(&node.tag.as_str()) || node.attrs.contains_key("tabindex")
    }

    /// The browser never focuses anything under a `hidden` element.
    fn in_hidden_subtree(&self, element: NodeId) -> bool {
        let mut current = Some(element);
        while let Some(id) = current {
            let node = self.node(id);
            if node.attrs.contains_key("hidden") {
                return true;
            }
            current = node.parent;
        }
        false
    }

    fn element_matches(&self, element: NodeId, selector: &Selector) -> bool {
        let node = self.node(element);
        selector.matches_with(&node.tag, &|name| node.attrs.get(name).map(String::as_str))
    }

    fn descendants(&self, scope: NodeId, out: &mut Vec<NodeId>) {
        for child in &self.node(scope).children {
            out.push(*child);
            self.descendants(*child, out);
        }
    }

    fn write_classes(&mut self, element: NodeId, classes: &[String]) {
        let attrs = &mut self.nodes[element.0].attrs;
        if classes.is_empty() {
            attrs.remove("class");
        } else {
            attrs.insert("class".to_string(), classes.join(" "));
        }
    }
}

impl Page for MemoryPage {
    type Element = NodeId;

    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let mut all = vec![self.root()];
        self.descendants(self.root(), &mut all);
        all.into_iter()
            .find(|n| self.node(*n).attrs.get("id").is_some_and(|v| v == id))
    }

    fn query_all(&self, scope: Option<&NodeId>, selector: &Selector) -> Vec<NodeId> {
        let mut candidates = Vec::new();
        match scope {
            Some(scope) => self.descendants(*scope, &mut candidates),
            None => {
                candidates.push(self.root());
                self.descendants(self.root(), &mut candidates);
            }
        }
        candidates
            .into_iter()
            .filter(|n| self.element_matches(*n, selector))
            .collect()
    }

    fn closest(&self, element: &NodeId, selector: &Selector) -> Option<NodeId> {
        let mut current = Some(*element);
        while let Some(node) = current {
            if self.element_matches(node, selector) {
                return Some(node);
            }
            current = self.node(node).parent;
        }
        None
    }

    fn matches(&self, element: &NodeId, selector: &Selector) -> bool {
        self.element_matches(*element, selector)
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let mut current = Some(*node);
        while let Some(n) = current {
            if n == *ancestor {
                return true;
            }
            current = self.node(n).parent;
        }
        false
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.node(*element).attrs.get(name).cloned()
    }

    fn set_attribute(&mut self, element: &NodeId, name: &str, value: &str) {
        self.nodes[element.0]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&mut self, element: &NodeId, name: &str) {
        self.nodes[element.0].attrs.remove(name);
    }

    fn has_class(&self, element: &NodeId, class: &str) -> bool {
        self.node(*element).classes().any(|c| c == class)
    }

    fn add_class(&mut self, element: &NodeId, class: &str) {
        let mut classes = self.classes(*element);
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
            self.write_classes(*element, &classes);
        }
    }

    fn remove_class(&mut self, element: &NodeId, class: &str) {
        let mut classes = self.classes(*element);
        let before = classes.len();
        classes.retain(|c| c != class);
        if classes.len() != before {
            self.write_classes(*element, &classes);
        }
    }

    fn set_text(&mut self, element: &NodeId, text: &str) {
        self.nodes[element.0].text = text.to_string();
    }

    fn is_hidden(&self, element: &NodeId) -> bool {
        self.has_attribute(element, "hidden")
    }

    fn set_hidden(&mut self, element: &NodeId, hidden: bool) {
        if hidden {
            self.set_attribute(element, "hidden", "");
        } else {
            self.remove_attribute(element, "hidden");
        }
    }

    fn value(&self, element: &NodeId) -> Option<String> {
        self.node(*element).value.clone()
    }

    fn active_element(&self) -> Option<NodeId> {
        self.active
    }

    fn focus(&mut self, element: &NodeId, _prevent_scroll: bool) -> bool {
        if !self.can_focus(*element) {
            return false;
        }
        self.active = Some(*element);
        true
    }

    fn scroll_into_view(&mut self, element: &NodeId) {
        self.scrolled_to = Some(*element);
    }

    fn scroll_to_top(&mut self) {
        self.scroll_offset = 0.0;
    }

    fn supports_intersection(&self) -> bool {
        self.intersection
    }

    fn observe(&mut self, element: &NodeId) {
        self.observed.insert(*element);
    }

    fn unobserve(&mut self, element: &NodeId) {
        self.observed.remove(element);
    }
}
