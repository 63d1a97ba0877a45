//! @acp:module "Events"
//! @acp:summary "Events and per-target listener lists"
//! @acp:domain dom
//! @acp:layer model

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// @acp:summary "An event dispatched to an element or the window"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    kind: String,
    detail: Option<String>,
}

impl Event {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

type Listener<T> = Rc<dyn Fn(&T, &Event)>;

/// Listener list owned by an event target of type `T`
pub(crate) struct Listeners<T> {
    entries: RefCell<Vec<(String, Listener<T>)>>,
}

impl<T> Listeners<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn add<F>(&self, kind: &str, listener: F)
    where
        F: Fn(&T, &Event) + 'static,
    {
        self.entries
            .borrow_mut()
            .push((kind.to_string(), Rc::new(listener)));
    }

    /// Invoke every listener for the event kind, in registration order
    pub(crate) fn dispatch(&self, target: &T, event: &Event) -> usize {
        // Snapshot so listeners can register further listeners while running
        let matching: Vec<Listener<T>> = self
            .entries
            .borrow()
            .iter()
            .filter(|(kind, _)| kind == event.kind())
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in &matching {
            listener(target, event);
        }
        matching.len()
    }

    pub(crate) fn count(&self, kind: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|(k, _)| k == kind)
            .count()
    }
}

impl<T> fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds: Vec<String> = self
            .entries
            .borrow()
            .iter()
            .map(|(kind, _)| kind.clone())
            .collect();
        f.debug_list().entries(kinds).finish()
    }
}
