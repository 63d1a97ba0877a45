//! @acp:module "Element"
//! @acp:summary "Shared element handle with attributes, classes and listeners"
//! @acp:domain dom
//! @acp:layer model

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::event::{Event, Listeners};

/// @acp:summary "Handle to an element; clones refer to the same node"
#[derive(Clone)]
pub struct Element(Rc<ElementNode>);

struct ElementNode {
    index: usize,
    tag: String,
    attributes: RefCell<Vec<(String, String)>>,
    listeners: Listeners<Element>,
}

impl Element {
    /// Create a detached element. `index` is its position in document order.
    pub fn new(index: usize, tag: &str, attributes: Vec<(String, String)>) -> Self {
        Self(Rc::new(ElementNode {
            index,
            tag: tag.to_ascii_lowercase(),
            attributes: RefCell::new(attributes),
            listeners: Listeners::new(),
        }))
    }

    /// Position in document order
    pub fn index(&self) -> usize {
        self.0.index
    }

    pub fn tag(&self) -> &str {
        &self.0.tag
    }

    /// Attribute names are matched case-insensitively
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.0
            .attributes
            .borrow()
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.0
            .attributes
            .borrow()
            .iter()
            .any(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    pub fn set_attribute(&self, name: &str, value: impl Into<String>) {
        let value = value.into();
        let mut attributes = self.0.attributes.borrow_mut();
        match attributes.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some((_, existing)) => *existing = value,
            None => attributes.push((name.to_ascii_lowercase(), value)),
        }
    }

    pub fn remove_attribute(&self, name: &str) -> Option<String> {
        let mut attributes = self.0.attributes.borrow_mut();
        let pos = attributes
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))?;
        Some(attributes.remove(pos).1)
    }

    pub fn attributes(&self) -> Vec<(String, String)> {
        self.0.attributes.borrow().clone()
    }

    pub fn id(&self) -> Option<String> {
        self.attribute("id").filter(|id| !id.is_empty())
    }

    pub fn class_list(&self) -> Vec<String> {
        self.attribute("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class_list().iter().any(|c| c == class)
    }

    /// Returns false if the class was already present
    pub fn add_class(&self, class: &str) -> bool {
        let mut classes = self.class_list();
        if classes.iter().any(|c| c == class) {
            return false;
        }
        classes.push(class.to_string());
        self.set_attribute("class", classes.join(" "));
        true
    }

    /// Returns false if the class was not present
    pub fn remove_class(&self, class: &str) -> bool {
        let mut classes = self.class_list();
        let before = classes.len();
        classes.retain(|c| c != class);
        if classes.len() == before {
            return false;
        }
        self.set_attribute("class", classes.join(" "));
        true
    }

    /// Returns whether the class is present afterwards
    pub fn toggle_class(&self, class: &str) -> bool {
        if self.remove_class(class) {
            false
        } else {
            self.add_class(class)
        }
    }

    pub fn add_event_listener<F>(&self, kind: &str, listener: F)
    where
        F: Fn(&Element, &Event) + 'static,
    {
        self.0.listeners.add(kind, listener);
    }

    /// Returns the number of listeners invoked
    pub fn dispatch(&self, event: &Event) -> usize {
        self.0.listeners.dispatch(self, event)
    }

    pub fn listener_count(&self, kind: &str) -> usize {
        self.0.listeners.count(kind)
    }

    /// True when both handles refer to the same node
    pub fn ptr_eq(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// @acp:summary "CSS-like label for diagnostics, e.g. `div#nav.menu`"
    pub fn describe(&self) -> String {
        let mut label = self.0.tag.clone();
        if let Some(id) = self.id() {
            label.push('#');
            label.push_str(&id);
        }
        for class in self.class_list() {
            label.push('.');
            label.push_str(&class);
        }
        label
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("index", &self.0.index)
            .field("tag", &self.0.tag)
            .field("attributes", &self.0.attributes.borrow())
            .field("listeners", &self.0.listeners)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn div(attrs: &[(&str, &str)]) -> Element {
        Element::new(
            0,
            "DIV",
            attrs
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_attribute_lookup_is_case_insensitive() {
        let el = div(&[("data-module-init", "tabs")]);
        assert_eq!(el.tag(), "div");
        assert_eq!(el.attribute("DATA-MODULE-INIT").as_deref(), Some("tabs"));
        assert!(el.has_attribute("data-module-init"));
        assert!(!el.has_attribute("id"));
    }

    #[test]
    fn test_class_manipulation() {
        let el = div(&[("class", "menu")]);
        assert!(el.add_class("is-open"));
        assert!(!el.add_class("is-open"));
        assert_eq!(el.class_list(), vec!["menu", "is-open"]);
        assert!(!el.toggle_class("is-open"));
        assert!(!el.has_class("is-open"));
        assert!(el.toggle_class("is-open"));
        assert!(el.remove_class("menu"));
        assert_eq!(el.attribute("class").as_deref(), Some("is-open"));
    }

    #[test]
    fn test_listeners_receive_current_target() {
        let el = div(&[("id", "nav")]);
        let hits = Rc::new(Cell::new(0));

        let counter = Rc::clone(&hits);
        el.add_event_listener("click", move |target, event| {
            assert_eq!(target.id().as_deref(), Some("nav"));
            assert_eq!(event.kind(), "click");
            counter.set(counter.get() + 1);
        });

        assert_eq!(el.dispatch(&Event::new("click")), 1);
        assert_eq!(el.dispatch(&Event::new("keydown")), 0);
        assert_eq!(hits.get(), 1);
        assert_eq!(el.listener_count("click"), 1);
    }

    #[test]
    fn test_clones_share_identity() {
        let el = div(&[]);
        let other = div(&[]);
        let clone = el.clone();
        clone.set_attribute("role", "tablist");
        assert_eq!(el.attribute("role").as_deref(), Some("tablist"));
        assert_eq!(el, clone);
        assert_ne!(el, other);
    }

    #[test]
    fn test_describe() {
        let el = div(&[("id", "main"), ("class", "tabs  js-tabs")]);
        assert_eq!(el.describe(), "div#main.tabs.js-tabs");
    }
}
