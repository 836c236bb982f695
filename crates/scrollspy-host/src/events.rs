//! Scroll listeners
//!
//! Additive subscription for document scroll events. Every subscriber gets
//! its own `ListenerId`; removing one never disturbs the others.

use std::cell::Cell;
use std::rc::Rc;

/// Listener handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Listener options
#[derive(Debug, Clone, Copy, Default)]
pub struct ListenerOptions {
    /// Passive listeners cannot cancel the scroll
    pub passive: bool,
    /// Remove after the first dispatch
    pub once: bool,
}

impl ListenerOptions {
    pub fn passive() -> Self {
        Self { passive: true, once: false }
    }
}

/// Scroll event delivered to listeners
#[derive(Debug)]
pub struct ScrollEvent {
    pub scroll_top: f64,
    pub scroll_left: f64,
    /// Virtual clock time of dispatch (ms)
    pub time_stamp: u64,
    passive: Cell<bool>,
    default_prevented: Cell<bool>,
}

impl ScrollEvent {
    pub fn new(scroll_left: f64, scroll_top: f64, time_stamp: u64) -> Self {
        Self {
            scroll_top,
            scroll_left,
            time_stamp,
            passive: Cell::new(false),
            default_prevented: Cell::new(false),
        }
    }

    /// Ask the host to cancel the scroll gesture. Ignored inside passive listeners.
    pub fn prevent_default(&self) {
        if self.passive.get() {
            tracing::warn!("Ignoring prevent_default inside passive scroll listener");
            return;
        }
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    pub(crate) fn enter_listener(&self, passive: bool) {
        self.passive.set(passive);
    }
}

pub type ScrollHandler = Rc<dyn Fn(&ScrollEvent)>;

struct Entry {
    id: ListenerId,
    options: ListenerOptions,
    handler: ScrollHandler,
}

/// Scroll listener registry
#[derive(Default)]
pub struct ScrollListeners {
    entries: Vec<Entry>,
    next_id: u64,
}

impl ScrollListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener; insertion order is dispatch order
    pub fn add(&mut self, options: ListenerOptions, handler: ScrollHandler) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, options, handler });
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() < before
    }

    /// Handlers to invoke for one dispatch. `once` listeners are
    /// unregistered as part of taking the snapshot.
    pub fn take_dispatch_list(&mut self) -> Vec<(ListenerOptions, ScrollHandler)> {
        let list = self
            .entries
            .iter()
            .map(|e| (e.options, e.handler.clone()))
            .collect();
        self.entries.retain(|e| !e.options.once);
        list
    }

    /// Options a listener was registered with
    pub fn options(&self, id: ListenerId) -> Option<ListenerOptions> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.options)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ScrollListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollListeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_remove_listener() {
        let mut listeners = ScrollListeners::new();
        let a = listeners.add(ListenerOptions::passive(), Rc::new(|_| {}));
        let b = listeners.add(ListenerOptions::passive(), Rc::new(|_| {}));
        assert_ne!(a, b);
        assert_eq!(listeners.len(), 2);

        assert!(listeners.remove(a));
        assert!(!listeners.remove(a));
        assert_eq!(listeners.len(), 1);
        assert!(listeners.options(a).is_none());
        assert!(listeners.options(b).is_some_and(|o| o.passive));
    }

    #[test]
    fn test_once_listener_removed_after_dispatch() {
        let mut listeners = ScrollListeners::new();
        listeners.add(ListenerOptions { passive: true, once: true }, Rc::new(|_| {}));
        listeners.add(ListenerOptions::passive(), Rc::new(|_| {}));

        assert_eq!(listeners.take_dispatch_list().len(), 2);
        assert_eq!(listeners.take_dispatch_list().len(), 1);
    }

    #[test]
    fn test_passive_prevent_default_ignored() {
        let event = ScrollEvent::new(0.0, 10.0, 0);
        event.enter_listener(true);
        event.prevent_default();
        assert!(!event.default_prevented());

        event.enter_listener(false);
        event.prevent_default();
        assert!(event.default_prevented());
    }
}
