//! @acp:module "Document Model"
//! @acp:summary "In-memory document built from rendered markup"
//! @acp:domain dom
//! @acp:layer model
//!
//! A flat, document-ordered element list plus the three shared handles every
//! behavior module receives: the window, the root (`<html>`) element and the
//! `<body>` element. Handles are `Rc`-based and single-threaded, mirroring
//! the UI thread that runs activation.

mod element;
mod event;
pub mod markup;
mod window;

use std::fmt;
use std::path::Path;

pub use element::Element;
pub use event::Event;
pub use window::{Window, BLANK_LOCATION};

use crate::error::Result;
use crate::ready::{Dispatch, ReadinessGate, ReadyState};

/// @acp:summary "Parsed document with readiness tracking"
pub struct Document {
    elements: Vec<Element>,
    root: Element,
    body: Element,
    window: Window,
    ready: ReadinessGate<Document>,
}

impl Document {
    /// @acp:summary "Build a document from markup; starts in the Loading state"
    /// Missing `<html>` or `<body>` elements are synthesized.
    pub fn parse(markup: &str) -> Self {
        Self::parse_at(markup, BLANK_LOCATION)
    }

    /// Like `parse`, with an explicit window location
    pub fn parse_at(markup: &str, location: &str) -> Self {
        let mut tags: Vec<(String, Vec<(String, String)>)> = markup::scan_start_tags(markup)
            .into_iter()
            .map(|tag| (tag.name, tag.attributes))
            .collect();

        if !tags.iter().any(|(name, _)| name == "html") {
            tags.insert(0, ("html".to_string(), Vec::new()));
        }
        if !tags.iter().any(|(name, _)| name == "body") {
            let html_pos = tags.iter().position(|(name, _)| name == "html").unwrap_or(0);
            tags.insert(html_pos + 1, ("body".to_string(), Vec::new()));
        }

        let elements: Vec<Element> = tags
            .into_iter()
            .enumerate()
            .map(|(index, (name, attributes))| Element::new(index, &name, attributes))
            .collect();

        // Both exist: synthesized above when absent
        let root = first_by_tag(&elements, "html");
        let body = first_by_tag(&elements, "body");

        tracing::debug!(elements = elements.len(), location, "parsed document");

        Self {
            elements,
            root,
            body,
            window: Window::new(location),
            ready: ReadinessGate::new(),
        }
    }

    /// Read and parse a markup file; the window location is the file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse_at(&content, &path.to_string_lossy()))
    }

    /// All elements in document order
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// @acp:summary "Snapshot of elements carrying an attribute, in document order"
    pub fn query_attribute(&self, name: &str) -> Vec<Element> {
        self.elements
            .iter()
            .filter(|el| el.has_attribute(name))
            .cloned()
            .collect()
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<Element> {
        self.elements
            .iter()
            .find(|el| el.id().as_deref() == Some(id))
            .cloned()
    }

    /// The `<html>` element
    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready.state()
    }

    /// @acp:summary "Run the callback once the document is fully parsed"
    /// Runs immediately when parsing has already finished.
    pub fn when_ready<F>(&self, callback: F) -> Dispatch
    where
        F: FnOnce(&Document) + 'static,
    {
        self.ready.when_ready(self, callback)
    }

    /// @acp:summary "Signal that parsing is complete"
    /// Fires pending ready callbacks once; later calls do nothing.
    pub fn finish_parsing(&self) -> usize {
        self.ready.mark_ready(self)
    }
}

fn first_by_tag(elements: &[Element], tag: &str) -> Element {
    elements
        .iter()
        .find(|el| el.tag() == tag)
        .cloned()
        .unwrap_or_else(|| Element::new(elements.len(), tag, Vec::new()))
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("location", &self.window.location())
            .field("elements", &self.elements.len())
            .field("ready", &self.ready)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><title>Demo</title></head>
<body class="home">
  <nav id="nav" data-module-init="menu"></nav>
  <div data-module-init="tabs accordion"><p>Text</p></div>
</body>
</html>"#;

    #[test]
    fn test_root_and_body_handles() {
        let doc = Document::parse(PAGE);
        assert_eq!(doc.root().tag(), "html");
        assert_eq!(doc.root().attribute("lang").as_deref(), Some("en"));
        assert_eq!(doc.body().tag(), "body");
        assert!(doc.body().has_class("home"));
        assert_eq!(doc.window().location(), BLANK_LOCATION);
    }

    #[test]
    fn test_query_attribute_is_document_ordered() {
        let doc = Document::parse(PAGE);
        let found = doc.query_attribute("data-module-init");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].tag(), "nav");
        assert_eq!(found[1].tag(), "div");
        assert!(found[0].index() < found[1].index());
        assert_eq!(doc.get_element_by_id("nav"), Some(found[0].clone()));
    }

    #[test]
    fn test_synthesizes_missing_html_and_body() {
        let doc = Document::parse(r#"<div data-module-init="tabs"></div>"#);
        assert_eq!(doc.root().tag(), "html");
        assert_eq!(doc.body().tag(), "body");
        let tags: Vec<_> = doc.elements().iter().map(|e| e.tag().to_string()).collect();
        assert_eq!(tags, vec!["html", "body", "div"]);
        assert_eq!(doc.elements()[0], *doc.root());
    }

    #[test]
    fn test_ready_gate_on_document() {
        let doc = Document::parse(PAGE);
        assert_eq!(doc.ready_state(), ReadyState::Loading);

        let seen = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&seen);
        doc.when_ready(move |doc| counter.set(doc.elements().len()));
        assert_eq!(seen.get(), 0);

        assert_eq!(doc.finish_parsing(), 1);
        assert_eq!(seen.get(), doc.elements().len());
        assert_eq!(doc.finish_parsing(), 0);
        assert_eq!(doc.ready_state(), ReadyState::Ready);
    }
}
