//! Observer errors
//!
//! All of these are raised synchronously at construction or registration.
//! The debounced classification path never returns an error.

/// Construction and registration failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObserverError {
    #[error("Invalid element: {0}")]
    InvalidElement(String),

    #[error("Invalid delay: {0}")]
    InvalidDelay(String),

    #[error("Unsupported zone '{0}': actions can only be added above, on, below, inView or notInView")]
    InvalidZone(String),

    #[error("Cannot add action that is not a function (got {0})")]
    InvalidCallback(String),
}
