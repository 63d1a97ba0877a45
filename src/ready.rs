//! @acp:module "Readiness Gate"
//! @acp:summary "Loading -> Ready state machine with idempotent ready checks"
//! @acp:domain core
//! @acp:layer service
//!
//! Callbacks registered while loading are queued and fire once, in
//! registration order, on the transition. Callbacks registered after the
//! transition run immediately, so a late registration is never lost.

use std::cell::{Cell, RefCell};
use std::fmt;

use serde::Serialize;

/// Document readiness state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadyState {
    /// Markup is still being parsed
    Loading,
    /// Markup is fully parsed
    Ready,
}

/// How a `when_ready` callback was dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Ran synchronously inside `when_ready`
    Immediate,
    /// Queued until `mark_ready`
    Deferred,
}

type ReadyCallback<C> = Box<dyn FnOnce(&C)>;

/// @acp:summary "One-shot readiness gate parameterized by the context handed to callbacks"
pub struct ReadinessGate<C> {
    state: Cell<ReadyState>,
    pending: RefCell<Vec<ReadyCallback<C>>>,
}

impl<C> ReadinessGate<C> {
    /// Gate in the `Loading` state
    pub fn new() -> Self {
        Self {
            state: Cell::new(ReadyState::Loading),
            pending: RefCell::new(Vec::new()),
        }
    }

    /// Gate that is already past the ready transition
    pub fn ready() -> Self {
        Self {
            state: Cell::new(ReadyState::Ready),
            pending: RefCell::new(Vec::new()),
        }
    }

    pub fn state(&self) -> ReadyState {
        self.state.get()
    }

    pub fn is_ready(&self) -> bool {
        self.state.get() == ReadyState::Ready
    }

    /// Number of callbacks waiting for the transition
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// @acp:summary "Run now if ready, otherwise queue for the transition"
    pub fn when_ready<F>(&self, ctx: &C, callback: F) -> Dispatch
    where
        F: FnOnce(&C) + 'static,
    {
        if self.is_ready() {
            callback(ctx);
            Dispatch::Immediate
        } else {
            self.pending.borrow_mut().push(Box::new(callback));
            Dispatch::Deferred
        }
    }

    /// @acp:summary "Fire the Loading -> Ready transition"
    /// Returns the number of queued callbacks that ran. A second call is a no-op.
    pub fn mark_ready(&self, ctx: &C) -> usize {
        if self.is_ready() {
            return 0;
        }
        self.state.set(ReadyState::Ready);

        // Release the borrow before running: callbacks may register more.
        let queued = std::mem::take(&mut *self.pending.borrow_mut());
        let count = queued.len();
        tracing::debug!(callbacks = count, "document ready");
        for callback in queued {
            callback(ctx);
        }
        count
    }
}

impl<C> Default for ReadinessGate<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for ReadinessGate<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadinessGate")
            .field("state", &self.state.get())
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_deferred_until_ready() {
        let gate: ReadinessGate<()> = ReadinessGate::new();
        let runs = Rc::new(Cell::new(0));

        let counter = Rc::clone(&runs);
        let dispatch = gate.when_ready(&(), move |_| counter.set(counter.get() + 1));
        assert_eq!(dispatch, Dispatch::Deferred);
        assert_eq!(runs.get(), 0);
        assert_eq!(gate.pending(), 1);

        assert_eq!(gate.mark_ready(&()), 1);
        assert_eq!(runs.get(), 1);
        assert_eq!(gate.state(), ReadyState::Ready);
    }

    #[test]
    fn test_mark_ready_is_one_shot() {
        let gate: ReadinessGate<()> = ReadinessGate::new();
        let runs = Rc::new(Cell::new(0));

        let counter = Rc::clone(&runs);
        gate.when_ready(&(), move |_| counter.set(counter.get() + 1));
        gate.mark_ready(&());
        assert_eq!(gate.mark_ready(&()), 0);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_late_registration_runs_immediately_each_time() {
        let gate: ReadinessGate<()> = ReadinessGate::ready();
        let runs = Rc::new(Cell::new(0));

        for _ in 0..3 {
            let counter = Rc::clone(&runs);
            let dispatch = gate.when_ready(&(), move |_| counter.set(counter.get() + 1));
            assert_eq!(dispatch, Dispatch::Immediate);
        }
        assert_eq!(runs.get(), 3);
        assert_eq!(gate.pending(), 0);
    }

    #[test]
    fn test_queued_callbacks_run_in_order_with_context() {
        let gate: ReadinessGate<RefCell<Vec<u32>>> = ReadinessGate::new();
        let log = RefCell::new(Vec::new());

        gate.when_ready(&log, |log| log.borrow_mut().push(1));
        gate.when_ready(&log, |log| log.borrow_mut().push(2));
        gate.mark_ready(&log);

        assert_eq!(*log.borrow(), vec![1, 2]);
    }
}
