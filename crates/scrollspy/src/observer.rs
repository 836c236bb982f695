//! Scroll observer
//!
//! Watches one element. Scroll events only (re)arm the debounce timer; the
//! timer runs a classification pass which measures the element, updates
//! the zone state and dispatches actions for the selected zones.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use scrollspy_host::{ListenerId, ListenerOptions, NodeId, TimerId, Window};

use crate::debounce::DebounceScheduler;
use crate::position::PositionTracker;
use crate::registry::{Action, ActionRegistry};
use crate::zone::{Classification, Transition, Vertical, Visibility, ZoneState};
use crate::{Dispatch, Element, ObserverError, ObserverOptions, Trigger, Zone};

/// Observer counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObserverStats {
    /// Classification passes run
    pub passes: u64,
    /// Callbacks invoked
    pub dispatched: u64,
    /// Callbacks that returned an error
    pub failures: u64,
}

struct ObserverInner {
    this: Weak<ObserverInner>,
    window: Window,
    element: Element,
    options: ObserverOptions,
    tracker: PositionTracker,
    registry: RefCell<ActionRegistry>,
    state: Cell<ZoneState>,
    reference_top: Cell<u64>,
    debounce: DebounceScheduler,
    listener: Cell<Option<ListenerId>>,
    startup: Cell<Option<TimerId>>,
    stats: Rc<Cell<ObserverStats>>,
}

/// Debounced element-position observer
pub struct Observer {
    inner: Rc<ObserverInner>,
}

impl Observer {
    /// Observe `element`, which must be an element node of the window's document.
    ///
    /// Installs a passive scroll listener and classifies once, either right
    /// away or after `startup_delay_ms`.
    pub fn new(window: &Window, element: NodeId, options: ObserverOptions) -> Result<Self, ObserverError> {
        if let Err(e) = window.document().element(element) {
            return Err(ObserverError::InvalidElement(e.to_string()));
        }

        let inner = Rc::new_cyclic(|this| ObserverInner {
            this: this.clone(),
            window: window.clone(),
            element: Element::new(window.clone(), element),
            options,
            tracker: PositionTracker::new(element, options.reference_offset),
            registry: RefCell::new(ActionRegistry::new()),
            state: Cell::new(ZoneState::default()),
            reference_top: Cell::new(0),
            debounce: DebounceScheduler::new(options.delay_ms),
            listener: Cell::new(None),
            startup: Cell::new(None),
            stats: Rc::new(Cell::new(ObserverStats::default())),
        });

        let weak = Rc::downgrade(&inner);
        let listener = window.add_scroll_listener(ListenerOptions::passive(), move |_event| {
            if let Some(inner) = weak.upgrade() {
                inner.on_scroll();
            }
        });
        inner.listener.set(Some(listener));

        tracing::debug!(
            "Observing element {} (delay {}ms, offset {}px)",
            element,
            options.delay_ms,
            options.reference_offset
        );

        match options.startup_delay_ms {
            None => {
                inner.run_pass();
            }
            Some(delay) => {
                let weak = Rc::downgrade(&inner);
                let id = window.set_timeout(delay, move || {
                    if let Some(inner) = weak.upgrade() {
                        inner.startup.set(None);
                        if inner.is_attached() {
                            inner.run_pass();
                        }
                    }
                });
                inner.startup.set(Some(id));
            }
        }

        Ok(Self { inner })
    }

    /// Observe with default options and a custom debounce delay
    pub fn with_delay(window: &Window, element: NodeId, delay_ms: u64) -> Result<Self, ObserverError> {
        Self::new(window, element, ObserverOptions::default().with_delay(delay_ms))
    }

    /// Register an action for `zone`
    pub fn add_action<F>(&self, zone: Zone, action: F) -> &Self
    where
        F: Fn(&Element) -> anyhow::Result<()> + 'static,
    {
        self.add_action_with(zone, false, action)
    }

    /// Register an action. With `immediate`, the action also runs once right
    /// now if `zone` is already the current zone.
    pub fn add_action_with<F>(&self, zone: Zone, immediate: bool, action: F) -> &Self
    where
        F: Fn(&Element) -> anyhow::Result<()> + 'static,
    {
        self.register(zone, immediate, Rc::new(action));
        self
    }

    /// Register an action under a zone name (`above`, `on`, `below`, `inView`, `notInView`)
    pub fn add_named_action<F>(&self, zone: &str, action: F) -> Result<&Self, ObserverError>
    where
        F: Fn(&Element) -> anyhow::Result<()> + 'static,
    {
        let zone: Zone = zone.parse()?;
        Ok(self.add_action(zone, action))
    }

    pub(crate) fn register(&self, zone: Zone, immediate: bool, action: Action) {
        self.inner.registry.borrow_mut().add(zone, action.clone());
        if immediate && self.inner.state.get().is_active(zone) {
            tracing::trace!("Running {} action immediately", zone);
            self.inner.invoke(zone, &action);
        }
    }

    pub fn when_above<F>(&self, action: F) -> &Self
    where
        F: Fn(&Element) -> anyhow::Result<()> + 'static,
    {
        self.add_action(Zone::Above, action)
    }

    pub fn when_on<F>(&self, action: F) -> &Self
    where
        F: Fn(&Element) -> anyhow::Result<()> + 'static,
    {
        self.add_action(Zone::On, action)
    }

    pub fn when_below<F>(&self, action: F) -> &Self
    where
        F: Fn(&Element) -> anyhow::Result<()> + 'static,
    {
        self.add_action(Zone::Below, action)
    }

    pub fn when_in_view<F>(&self, action: F) -> &Self
    where
        F: Fn(&Element) -> anyhow::Result<()> + 'static,
    {
        self.add_action(Zone::InView, action)
    }

    pub fn when_not_in_view<F>(&self, action: F) -> &Self
    where
        F: Fn(&Element) -> anyhow::Result<()> + 'static,
    {
        self.add_action(Zone::NotInView, action)
    }

    /// Dispatch every action registered for `zone`, using the configured dispatch mode
    pub fn run_actions(&self, zone: Zone) {
        self.inner.dispatch(zone);
    }

    pub fn run_named_actions(&self, zone: &str) -> Result<(), ObserverError> {
        let zone: Zone = zone.parse()?;
        self.run_actions(zone);
        Ok(())
    }

    /// Classify now, bypassing and cancelling any pending debounced pass.
    /// Returns the zones entered, or None once disposed.
    pub fn update(&self) -> Option<Transition> {
        if self.is_disposed() {
            return None;
        }
        self.inner.debounce.cancel(&self.inner.window);
        if let Some(id) = self.inner.startup.take() {
            self.inner.window.clear_timeout(id);
        }
        Some(self.inner.run_pass())
    }

    /// Alias of `update`
    pub fn check(&self) -> Option<Transition> {
        self.update()
    }

    /// Stop listening for scroll and cancel pending timers. Registered
    /// actions are kept but never dispatched again by scrolling.
    pub fn dispose(&self) {
        if self.inner.detach() {
            tracing::debug!("Disposed observer for element {}", self.inner.element.node());
        }
    }

    pub fn is_disposed(&self) -> bool {
        !self.inner.is_attached()
    }

    /// Current zones, once the first pass has run
    pub fn zone(&self) -> Option<Classification> {
        self.inner.state.get().classification()
    }

    pub fn vertical(&self) -> Option<Vertical> {
        self.inner.state.get().vertical
    }

    pub fn visibility(&self) -> Option<Visibility> {
        self.inner.state.get().visibility
    }

    pub fn is_in(&self, zone: Zone) -> bool {
        self.inner.state.get().is_active(zone)
    }

    /// Last computed reference top
    pub fn reference_top(&self) -> u64 {
        self.inner.reference_top.get()
    }

    pub fn element(&self) -> &Element {
        &self.inner.element
    }

    pub fn options(&self) -> &ObserverOptions {
        &self.inner.options
    }

    pub fn action_count(&self, zone: Zone) -> usize {
        self.inner.registry.borrow().len(zone)
    }

    pub fn stats(&self) -> ObserverStats {
        self.inner.stats.get()
    }

    /// Whether a debounced pass is waiting for its quiet period
    pub fn is_pending(&self) -> bool {
        self.inner.debounce.is_pending()
    }
}

impl std::fmt::Debug for Observer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observer")
            .field("element", &self.inner.element.node())
            .field("options", &self.inner.options)
            .field("state", &self.inner.state.get())
            .field("reference_top", &self.inner.reference_top.get())
            .field("actions", &*self.inner.registry.borrow())
            .finish()
    }
}

impl ObserverInner {
    fn is_attached(&self) -> bool {
        self.listener.get().is_some()
    }

    fn on_scroll(&self) {
        // a dispatch already in flight may still reach a disposed observer
        if !self.is_attached() {
            return;
        }
        let this = self.this.clone();
        self.debounce.schedule(&self.window, move || {
            if let Some(inner) = this.upgrade() {
                inner.debounce.fired();
                if inner.is_attached() {
                    inner.run_pass();
                }
            }
        });
    }

    /// One classification pass: measure, classify, record, dispatch
    fn run_pass(&self) -> Transition {
        let measurement = {
            let document = self.window.document();
            self.tracker.measure(&document)
        };
        let measurement = match measurement {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("Skipping classification: {}", e);
                return Transition::default();
            }
        };

        self.reference_top.set(measurement.top);
        let classification = crate::zone::classify(
            measurement.scroll,
            measurement.top,
            &measurement.rect,
            &measurement.viewport,
        );

        let mut state = self.state.get();
        let transition = state.transition(classification);
        self.state.set(state);

        let mut stats = self.stats.get();
        stats.passes += 1;
        self.stats.set(stats);

        tracing::trace!(
            "Pass {}: scroll {} top {} -> {:?}",
            stats.passes,
            measurement.scroll,
            measurement.top,
            classification
        );
        if !transition.is_empty() {
            tracing::debug!("Element {} entered {:?}", self.element.node(), transition.zones());
        }

        let zones = match self.options.trigger {
            Trigger::Edge => transition.zones(),
            Trigger::Level => classification.zones().to_vec(),
        };
        for zone in zones {
            self.dispatch(zone);
        }
        transition
    }

    fn dispatch(&self, zone: Zone) {
        let actions = self.registry.borrow().snapshot(zone);
        for action in actions {
            match self.options.dispatch {
                Dispatch::Inline => self.invoke(zone, &action),
                Dispatch::Task => {
                    let element = self.element.clone();
                    let stats = self.stats.clone();
                    self.window
                        .queue_task(move || run_action(zone, &action, &element, &stats));
                }
            }
        }
    }

    fn invoke(&self, zone: Zone, action: &Action) {
        run_action(zone, action, &self.element, &self.stats);
    }

    /// Remove the listener and timers. Returns false if already detached.
    fn detach(&self) -> bool {
        let Some(listener) = self.listener.take() else {
            return false;
        };
        self.window.remove_scroll_listener(listener);
        self.debounce.cancel(&self.window);
        if let Some(id) = self.startup.take() {
            self.window.clear_timeout(id);
        }
        true
    }
}

impl Drop for ObserverInner {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Invoke one action, isolating its failure
fn run_action(zone: Zone, action: &Action, element: &Element, stats: &Cell<ObserverStats>) {
    let result = action(element);

    let mut s = stats.get();
    s.dispatched += 1;
    if let Err(e) = &result {
        s.failures += 1;
        tracing::warn!("{} action for element {} failed: {:#}", zone, element.node(), e);
    }
    stats.set(s);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::OnceCell;

    use scrollspy_host::{DOMRect, Viewport};

    fn page(top: f64) -> (Window, NodeId) {
        let window = Window::new(Viewport::new(800.0, 600.0));
        let el = window
            .document_mut()
            .create_element("nav", DOMRect::from_xywh(0.0, top, 800.0, 50.0));
        (window, el)
    }

    fn counter() -> (Rc<Cell<u32>>, impl Fn(&Element) -> anyhow::Result<()> + 'static) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (count, move |_: &Element| {
            c.set(c.get() + 1);
            Ok(())
        })
    }

    #[test]
    fn test_rejects_non_element() {
        let (window, _) = page(200.0);
        let text = window.document_mut().create_text("hi");

        let err = Observer::new(&window, text, ObserverOptions::default()).unwrap_err();
        assert!(matches!(err, ObserverError::InvalidElement(_)));

        let err = Observer::new(&window, NodeId::from_raw(42), ObserverOptions::default()).unwrap_err();
        assert!(matches!(err, ObserverError::InvalidElement(_)));
    }

    #[test]
    fn test_initial_pass_at_construction() {
        let (window, el) = page(200.0);
        let observer = Observer::new(&window, el, ObserverOptions::default()).unwrap();

        assert_eq!(observer.vertical(), Some(Vertical::Above));
        assert_eq!(observer.visibility(), Some(Visibility::InView));
        assert_eq!(observer.reference_top(), 200);
        assert_eq!(observer.stats().passes, 1);
    }

    #[test]
    fn test_scroll_only_arms_timer() {
        let (window, el) = page(200.0);
        let observer = Observer::new(&window, el, ObserverOptions::default()).unwrap();

        window.scroll_to(300.0);
        assert!(observer.is_pending());
        assert_eq!(observer.vertical(), Some(Vertical::Above));

        window.advance(100);
        assert!(!observer.is_pending());
        assert_eq!(observer.vertical(), Some(Vertical::Below));
        assert_eq!(observer.stats().passes, 2);
    }

    #[test]
    fn test_inline_dispatch_runs_during_pass() {
        let (window, el) = page(200.0);
        let observer = Observer::new(
            &window,
            el,
            ObserverOptions::default().with_dispatch(Dispatch::Inline),
        )
        .unwrap();
        let (count, action) = counter();
        observer.when_below(action);

        window.scroll_to(250.0);
        observer.update();
        assert_eq!(count.get(), 1);
        assert_eq!(window.pending_tasks(), 0);
    }

    #[test]
    fn test_task_dispatch_defers_to_event_loop() {
        let (window, el) = page(200.0);
        let observer = Observer::new(&window, el, ObserverOptions::default()).unwrap();
        let (count, action) = counter();
        observer.when_below(action);

        window.scroll_to(250.0);
        observer.update();
        assert_eq!(count.get(), 0);
        assert_eq!(window.pending_tasks(), 1);

        window.drain_tasks();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_update_cancels_pending_pass() {
        let (window, el) = page(200.0);
        let observer = Observer::new(&window, el, ObserverOptions::default()).unwrap();

        window.scroll_to(200.0);
        assert!(observer.is_pending());
        observer.update();
        assert!(!observer.is_pending());
        assert_eq!(window.pending_timers(), 0);
        assert_eq!(observer.vertical(), Some(Vertical::On));
    }

    #[test]
    fn test_observer_listener_is_passive() {
        let (window, el) = page(200.0);
        let observer = Observer::new(&window, el, ObserverOptions::default()).unwrap();
        let id = observer.inner.listener.get().unwrap();

        assert!(window.scroll_listener_options(id).is_some_and(|o| o.passive));
        let event = window.scroll_to(300.0).unwrap();
        assert!(!event.default_prevented());

        observer.dispose();
        assert!(window.scroll_listener_options(id).is_none());
    }

    #[test]
    fn test_dispose_during_scroll_dispatch() {
        let (window, el) = page(200.0);
        let slot: Rc<OnceCell<Observer>> = Rc::new(OnceCell::new());

        // registered first, so it runs before the observer's own listener
        let weak = Rc::downgrade(&slot);
        window.add_scroll_listener(ListenerOptions::passive(), move |_| {
            if let Some(slot) = weak.upgrade() {
                if let Some(observer) = slot.get() {
                    observer.dispose();
                }
            }
        });
        let observer = slot.get_or_init(|| Observer::new(&window, el, ObserverOptions::default()).unwrap());
        let (below, below_action) = counter();
        observer.when_below(below_action);

        window.scroll_to(400.0);
        assert!(observer.is_disposed());
        assert!(!observer.is_pending());
        assert_eq!(window.pending_timers(), 0);

        window.run_until_idle();
        assert_eq!(observer.stats().passes, 1);
        assert_eq!(below.get(), 0);
        assert_eq!(observer.vertical(), Some(Vertical::Above));
    }

    #[test]
    fn test_drop_removes_listener() {
        let (window, el) = page(200.0);
        {
            let _observer = Observer::new(&window, el, ObserverOptions::default()).unwrap();
            window.scroll_to(10.0);
            assert_eq!(window.scroll_listener_count(), 1);
        }
        assert_eq!(window.scroll_listener_count(), 0);
        assert_eq!(window.pending_timers(), 0);
    }
}
