//! Debounce scheduler
//!
//! At most one pending timer. Scheduling replaces whatever was pending.

use std::cell::Cell;

use scrollspy_host::{TimerId, Window};

#[derive(Debug)]
pub struct DebounceScheduler {
    delay_ms: u64,
    pending: Cell<Option<TimerId>>,
}

impl DebounceScheduler {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: Cell::new(None),
        }
    }

    /// Cancel the pending run, if any, and schedule `run` after the quiet period.
    /// `run` must call `fired` before doing its work.
    pub fn schedule(&self, window: &Window, run: impl FnOnce() + 'static) -> TimerId {
        self.cancel(window);
        let id = window.set_timeout(self.delay_ms, run);
        self.pending.set(Some(id));
        id
    }

    /// Drop the pending run. Returns true if one was cancelled.
    pub fn cancel(&self, window: &Window) -> bool {
        match self.pending.take() {
            Some(id) => window.clear_timeout(id),
            None => false,
        }
    }

    /// Mark the pending timer as consumed
    pub fn fired(&self) {
        self.pending.set(None);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }
}
