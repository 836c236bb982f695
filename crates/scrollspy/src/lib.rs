//! scrollspy - Debounced element-position observer
//!
//! Tracks one element of a scrolling document and runs registered actions
//! when it changes zone:
//!
//! - vertical: the reference line is `above`, `on` or `below` the element top
//! - visibility: the element box is `inView` or `notInView`
//!
//! Scroll events are debounced; only the debounced pass measures layout and
//! dispatches actions.
//!
//! ```no_run
//! use scrollspy::{Observer, ObserverOptions};
//! use scrollspy_host::{DOMRect, Viewport, Window};
//!
//! let window = Window::new(Viewport::new(800.0, 600.0));
//! let nav = window.document_mut().create_element("nav", DOMRect::from_xywh(0.0, 200.0, 800.0, 40.0));
//!
//! let observer = Observer::new(&window, nav, ObserverOptions::default()).unwrap();
//! observer
//!     .when_below(|el| Ok(el.toggle_class("is-sticky", true)?))
//!     .when_above(|el| Ok(el.toggle_class("is-sticky", false)?));
//!
//! window.scroll_to(350.0);
//! window.advance(100);
//! ```

pub mod bindings;
mod debounce;
mod element;
mod error;
mod observer;
mod options;
pub mod position;
mod registry;
pub mod zone;

pub use debounce::DebounceScheduler;
pub use element::Element;
pub use error::ObserverError;
pub use observer::{Observer, ObserverStats};
pub use options::{DEFAULT_DELAY_MS, Dispatch, ObserverOptions, Trigger};
pub use registry::{Action, ActionRegistry};
pub use zone::{Classification, Transition, Vertical, Visibility, Zone, ZoneState};
