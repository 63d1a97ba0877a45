//! @acp:module "Window"
//! @acp:summary "Shared window handle"
//! @acp:domain dom
//! @acp:layer model

use std::fmt;
use std::rc::Rc;

use super::event::{Event, Listeners};

/// Default location for documents parsed without a URL
pub const BLANK_LOCATION: &str = "about:blank";

/// @acp:summary "Handle to the window; clones refer to the same window"
#[derive(Clone)]
pub struct Window(Rc<WindowInner>);

struct WindowInner {
    location: String,
    listeners: Listeners<Window>,
}

impl Window {
    pub fn new(location: impl Into<String>) -> Self {
        Self(Rc::new(WindowInner {
            location: location.into(),
            listeners: Listeners::new(),
        }))
    }

    pub fn location(&self) -> &str {
        &self.0.location
    }

    pub fn add_event_listener<F>(&self, kind: &str, listener: F)
    where
        F: Fn(&Window, &Event) + 'static,
    {
        self.0.listeners.add(kind, listener);
    }

    pub fn dispatch(&self, event: &Event) -> usize {
        self.0.listeners.dispatch(self, event)
    }

    pub fn listener_count(&self, kind: &str) -> usize {
        self.0.listeners.count(kind)
    }

    pub fn ptr_eq(&self, other: &Window) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new(BLANK_LOCATION)
    }
}

impl PartialEq for Window {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Window {}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("location", &self.0.location)
            .field("listeners", &self.0.listeners)
            .finish()
    }
}
