//! Observer options

/// Default debounce quiet time
pub const DEFAULT_DELAY_MS: u64 = 100;

/// How callbacks are invoked once a pass selects a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dispatch {
    /// Each callback is queued as its own macrotask on the host loop.
    /// Callbacks from one pass may interleave with a later pass.
    #[default]
    Task,
    /// Callbacks run inside the classification pass, in order.
    Inline,
}

/// When a pass dispatches a zone's callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Trigger {
    /// Only when the axis enters a new zone
    #[default]
    Edge,
    /// On every pass, for every active zone
    Level,
}

/// Observer configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    /// Debounce quiet time after the last scroll event
    pub delay_ms: u64,
    /// Delay the initial classification instead of running it during construction
    pub startup_delay_ms: Option<u64>,
    /// Distance of the reference line below the viewport top (px)
    pub reference_offset: f64,
    pub dispatch: Dispatch,
    pub trigger: Trigger,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            startup_delay_ms: None,
            reference_offset: 0.0,
            dispatch: Dispatch::default(),
            trigger: Trigger::default(),
        }
    }
}

impl ObserverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_startup_delay(mut self, delay_ms: u64) -> Self {
        self.startup_delay_ms = Some(delay_ms);
        self
    }

    pub fn with_reference_offset(mut self, offset: f64) -> Self {
        self.reference_offset = offset;
        self
    }

    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }
}
