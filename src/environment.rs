//! @acp:module "Environment Handles"
//! @acp:summary "Shared window/root/body handles passed to every module factory"
//! @acp:domain core
//! @acp:layer model

use crate::dom::{Document, Element, Window};

/// @acp:summary "Handles shared by every module constructed in one activation pass"
/// Built once per pass; the engine never mutates them.
#[derive(Debug, Clone)]
pub struct Environment {
    window: Window,
    root: Element,
    body: Element,
}

impl Environment {
    pub fn new(window: Window, root: Element, body: Element) -> Self {
        Self { window, root, body }
    }

    pub fn from_document(document: &Document) -> Self {
        Self::new(
            document.window().clone(),
            document.root().clone(),
            document.body().clone(),
        )
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// The `<html>` element
    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    /// True when both environments hold the very same three handles
    pub fn same_handles(&self, other: &Environment) -> bool {
        self.window.ptr_eq(&other.window)
            && self.root.ptr_eq(&other.root)
            && self.body.ptr_eq(&other.body)
    }
}
