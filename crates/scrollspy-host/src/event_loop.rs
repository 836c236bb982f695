//! Event Loop Implementation
//!
//! Macrotask queue and one-shot timers on a virtual millisecond clock.
//! The loop only stores work; `Window` pulls it out and runs it so that
//! no borrow of the loop is held while a callback executes.

use std::collections::VecDeque;

/// Deferred unit of work
pub type Callback = Box<dyn FnOnce()>;

/// Timer handle returned by `set_timeout`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Timer task
struct Timer {
    id: TimerId,
    due_at: u64,
    callback: Callback,
}

/// Event loop
#[derive(Default)]
pub struct EventLoop {
    /// Macrotask queue (queued callbacks, expired timers run inline)
    macrotasks: VecDeque<Callback>,
    /// Pending timers
    timers: Vec<Timer>,
    /// Next timer ID
    next_timer_id: u64,
    /// Current timestamp (ms)
    current_time: u64,
}

impl EventLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a macrotask
    pub fn queue_macrotask(&mut self, callback: Callback) {
        self.macrotasks.push_back(callback);
    }

    /// Set a timeout relative to the current time
    pub fn set_timeout(&mut self, delay_ms: u64, callback: Callback) -> TimerId {
        let id = TimerId(self.next_timer_id);
        self.next_timer_id += 1;
        self.timers.push(Timer {
            id,
            due_at: self.current_time.saturating_add(delay_ms),
            callback,
        });
        id
    }

    /// Clear a timeout. Returns false if it already fired or never existed.
    pub fn clear_timer(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() < before
    }

    /// Remove and return the earliest timer due at or before `until`,
    /// moving the clock to its deadline. Ties fire in scheduling order.
    pub fn take_due_timer(&mut self, until: u64) -> Option<Callback> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_at <= until)
            .min_by_key(|(_, t)| (t.due_at, t.id))
            .map(|(i, _)| i)?;

        let timer = self.timers.swap_remove(index);
        self.current_time = self.current_time.max(timer.due_at);
        Some(timer.callback)
    }

    /// Get next macrotask (if any)
    pub fn next_macrotask(&mut self) -> Option<Callback> {
        self.macrotasks.pop_front()
    }

    /// Earliest pending timer deadline
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.iter().map(|t| t.due_at).min()
    }

    /// Move the clock forward; never backwards
    pub fn set_time(&mut self, time: u64) {
        self.current_time = self.current_time.max(time);
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn pending_tasks(&self) -> usize {
        self.macrotasks.len()
    }

    /// Check if there's pending work
    pub fn has_pending_work(&self) -> bool {
        !self.macrotasks.is_empty() || !self.timers.is_empty()
    }

    /// Get current time
    pub fn current_time(&self) -> u64 {
        self.current_time
    }
}

impl std::fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLoop")
            .field("macrotasks", &self.macrotasks.len())
            .field("timers", &self.timers.len())
            .field("current_time", &self.current_time)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<u32>>>, impl Fn(u32) -> Callback) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log2 = log.clone();
        let make = move |n: u32| -> Callback {
            let log = log2.clone();
            Box::new(move || log.borrow_mut().push(n))
        };
        (log, make)
    }

    #[test]
    fn test_timeout() {
        let mut loop_ = EventLoop::new();
        let (log, make) = recorder();
        loop_.set_timeout(100, make(1));

        assert!(loop_.take_due_timer(50).is_none());
        let cb = loop_.take_due_timer(110).unwrap();
        cb();

        assert_eq!(*log.borrow(), vec![1]);
        assert_eq!(loop_.current_time(), 100);
        assert!(!loop_.has_pending_work());
    }

    #[test]
    fn test_timers_fire_in_deadline_order() {
        let mut loop_ = EventLoop::new();
        let (log, make) = recorder();
        loop_.set_timeout(30, make(3));
        loop_.set_timeout(10, make(1));
        loop_.set_timeout(10, make(2));

        while let Some(cb) = loop_.take_due_timer(100) {
            cb();
        }
        assert_eq!(*log.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn test_clear_timer() {
        let mut loop_ = EventLoop::new();
        let (_, make) = recorder();
        let id = loop_.set_timeout(10, make(1));

        assert!(loop_.clear_timer(id));
        assert!(!loop_.clear_timer(id));
        assert_eq!(loop_.pending_timers(), 0);
    }

    #[test]
    fn test_macrotasks_fifo() {
        let mut loop_ = EventLoop::new();
        let (log, make) = recorder();
        loop_.queue_macrotask(make(1));
        loop_.queue_macrotask(make(2));

        while let Some(task) = loop_.next_macrotask() {
            task();
        }
        assert_eq!(*log.borrow(), vec![1, 2]);
    }
}
