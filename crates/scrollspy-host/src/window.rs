//! Window - shared handle over document, listeners and event loop
//!
//! Single-threaded: the handle is an `Rc` and all state sits behind
//! `RefCell`s. Borrows are always released before user code runs, so
//! callbacks may freely scroll, schedule timers or add listeners.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::event_loop::EventLoop;
use crate::events::{ListenerId, ListenerOptions, ScrollEvent, ScrollListeners};
use crate::{Document, TimerId, Viewport};

struct WindowInner {
    document: RefCell<Document>,
    listeners: RefCell<ScrollListeners>,
    event_loop: RefCell<EventLoop>,
}

/// Browsing context handle
#[derive(Clone)]
pub struct Window {
    inner: Rc<WindowInner>,
}

impl Window {
    /// Create a window with an empty document
    pub fn new(viewport: Viewport) -> Self {
        Self::from_document(Document::new(viewport))
    }

    pub fn from_document(document: Document) -> Self {
        Self {
            inner: Rc::new(WindowInner {
                document: RefCell::new(document),
                listeners: RefCell::new(ScrollListeners::new()),
                event_loop: RefCell::new(EventLoop::new()),
            }),
        }
    }

    pub fn document(&self) -> Ref<'_, Document> {
        self.inner.document.borrow()
    }

    pub fn document_mut(&self) -> RefMut<'_, Document> {
        self.inner.document.borrow_mut()
    }

    /// Current virtual time (ms)
    pub fn now(&self) -> u64 {
        self.inner.event_loop.borrow().current_time()
    }

    pub fn set_timeout(&self, delay_ms: u64, callback: impl FnOnce() + 'static) -> TimerId {
        let id = self
            .inner
            .event_loop
            .borrow_mut()
            .set_timeout(delay_ms, Box::new(callback));
        tracing::trace!("Scheduled timer {:?} in {}ms", id, delay_ms);
        id
    }

    pub fn clear_timeout(&self, id: TimerId) -> bool {
        self.inner.event_loop.borrow_mut().clear_timer(id)
    }

    /// Queue a macrotask; it runs on the next `advance` or `run_until_idle`
    pub fn queue_task(&self, task: impl FnOnce() + 'static) {
        self.inner
            .event_loop
            .borrow_mut()
            .queue_macrotask(Box::new(task));
    }

    pub fn add_scroll_listener(
        &self,
        options: ListenerOptions,
        handler: impl Fn(&ScrollEvent) + 'static,
    ) -> ListenerId {
        let id = self
            .inner
            .listeners
            .borrow_mut()
            .add(options, Rc::new(handler));
        tracing::debug!("Added scroll listener {:?} (passive: {})", id, options.passive);
        id
    }

    pub fn remove_scroll_listener(&self, id: ListenerId) -> bool {
        let removed = self.inner.listeners.borrow_mut().remove(id);
        if removed {
            tracing::debug!("Removed scroll listener {:?}", id);
        }
        removed
    }

    pub fn scroll_listener_options(&self, id: ListenerId) -> Option<ListenerOptions> {
        self.inner.listeners.borrow().options(id)
    }

    pub fn scroll_listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Scroll the document vertically. Listeners are notified synchronously
    /// when the offset actually changes. Returns the dispatched event, if any.
    pub fn scroll_to(&self, top: f64) -> Option<ScrollEvent> {
        let left = self.document().scroll_left();
        self.scroll_to_xy(left, top)
    }

    pub fn scroll_by(&self, dy: f64) -> Option<ScrollEvent> {
        let top = self.document().scroll_top();
        self.scroll_to(top + dy)
    }

    pub fn scroll_to_xy(&self, left: f64, top: f64) -> Option<ScrollEvent> {
        let changed = self.document_mut().set_scroll(left, top);
        if !changed {
            return None;
        }
        Some(self.dispatch_scroll())
    }

    /// Fire a scroll event at the current offsets regardless of movement
    pub fn dispatch_scroll(&self) -> ScrollEvent {
        let event = {
            let doc = self.document();
            ScrollEvent::new(doc.scroll_left(), doc.scroll_top(), self.now())
        };
        let handlers = self.inner.listeners.borrow_mut().take_dispatch_list();
        for (options, handler) in handlers {
            event.enter_listener(options.passive);
            handler(&event);
        }
        event
    }

    /// Run queued macrotasks until the queue is empty
    pub fn drain_tasks(&self) -> usize {
        let mut ran = 0;
        loop {
            let task = self.inner.event_loop.borrow_mut().next_macrotask();
            match task {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }

    /// Advance the clock by `ms`, firing due timers in deadline order and
    /// draining macrotasks after each one
    pub fn advance(&self, ms: u64) {
        let target = self.now().saturating_add(ms);
        self.drain_tasks();
        loop {
            let timer = self.inner.event_loop.borrow_mut().take_due_timer(target);
            match timer {
                Some(callback) => {
                    callback();
                    self.drain_tasks();
                }
                None => break,
            }
        }
        self.inner.event_loop.borrow_mut().set_time(target);
    }

    /// Run every queued task and pending timer
    pub fn run_until_idle(&self) {
        self.drain_tasks();
        loop {
            let deadline = self.inner.event_loop.borrow().next_deadline();
            match deadline {
                Some(deadline) => {
                    let now = self.now();
                    self.advance(deadline.saturating_sub(now));
                }
                None => break,
            }
        }
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.event_loop.borrow().pending_timers()
    }

    pub fn pending_tasks(&self) -> usize {
        self.inner.event_loop.borrow().pending_tasks()
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("event_loop", &*self.inner.event_loop.borrow())
            .field("listeners", &*self.inner.listeners.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_scroll_notifies_listeners() {
        let window = Window::default();
        let seen = Rc::new(Cell::new(0.0));
        let seen2 = seen.clone();
        window.add_scroll_listener(ListenerOptions::passive(), move |e| seen2.set(e.scroll_top));

        assert!(window.scroll_to(120.0).is_some());
        assert_eq!(seen.get(), 120.0);

        // no movement, no event
        assert!(window.scroll_to(120.0).is_none());
    }

    #[test]
    fn test_listeners_are_additive() {
        let window = Window::default();
        let count = Rc::new(Cell::new(0));
        let (c1, c2) = (count.clone(), count.clone());
        let a = window.add_scroll_listener(ListenerOptions::passive(), move |_| c1.set(c1.get() + 1));
        window.add_scroll_listener(ListenerOptions::passive(), move |_| c2.set(c2.get() + 1));

        window.scroll_to(10.0);
        assert_eq!(count.get(), 2);

        window.remove_scroll_listener(a);
        window.scroll_to(20.0);
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn test_passive_listener_cannot_cancel_scroll() {
        let window = Window::default();
        window.add_scroll_listener(ListenerOptions::passive(), |e| e.prevent_default());

        let event = window.scroll_to(50.0).unwrap();
        assert!(!event.default_prevented());
    }

    #[test]
    fn test_advance_fires_timers_and_tasks() {
        let window = Window::default();
        let log = Rc::new(RefCell::new(Vec::new()));

        let (l1, w) = (log.clone(), window.clone());
        window.set_timeout(100, move || {
            l1.borrow_mut().push(("timer", w.now()));
            let l2 = l1.clone();
            let w2 = w.clone();
            w.queue_task(move || l2.borrow_mut().push(("task", w2.now())));
        });

        window.advance(99);
        assert!(log.borrow().is_empty());

        window.advance(1);
        assert_eq!(*log.borrow(), vec![("timer", 100), ("task", 100)]);
        assert_eq!(window.now(), 100);
    }

    #[test]
    fn test_cleared_timer_never_fires() {
        let window = Window::default();
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        let id = window.set_timeout(10, move || f.set(true));

        assert!(window.clear_timeout(id));
        window.run_until_idle();
        assert!(!fired.get());
    }
}
