//! Script bindings
//!
//! Untyped entry points for hosts that hand over dynamic values (an embedded
//! script engine, a config loader). The typed API cannot express a missing
//! element, a fractional delay or a non-callable action; these entry points
//! can, and reject them.

use std::fmt;

use scrollspy_host::{NodeId, Window};

use crate::registry::Action;
use crate::{DEFAULT_DELAY_MS, Observer, ObserverError, ObserverOptions, Zone};

/// Dynamic value
#[derive(Clone)]
pub enum ScriptValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Node(NodeId),
    Function(Action),
}

impl ScriptValue {
    /// Wrap a closure as a callable value
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&crate::Element) -> anyhow::Result<()> + 'static,
    {
        ScriptValue::Function(std::rc::Rc::new(f))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ScriptValue::Undefined => "undefined",
            ScriptValue::Null => "null",
            ScriptValue::Bool(_) => "boolean",
            ScriptValue::Number(_) => "number",
            ScriptValue::String(_) => "string",
            ScriptValue::Node(_) => "node",
            ScriptValue::Function(_) => "function",
        }
    }

    fn is_truthy(&self) -> bool {
        match self {
            ScriptValue::Undefined | ScriptValue::Null => false,
            ScriptValue::Bool(b) => *b,
            ScriptValue::Number(n) => *n != 0.0 && !n.is_nan(),
            ScriptValue::String(s) => !s.is_empty(),
            ScriptValue::Node(_) | ScriptValue::Function(_) => true,
        }
    }
}

impl fmt::Debug for ScriptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptValue::Undefined => write!(f, "Undefined"),
            ScriptValue::Null => write!(f, "Null"),
            ScriptValue::Bool(b) => write!(f, "Bool({})", b),
            ScriptValue::Number(n) => write!(f, "Number({})", n),
            ScriptValue::String(s) => write!(f, "String({:?})", s),
            ScriptValue::Node(id) => write!(f, "Node({})", id),
            ScriptValue::Function(_) => write!(f, "Function"),
        }
    }
}

/// Validate a delay given in milliseconds: finite, non-negative, integral
pub fn delay_from_millis(ms: f64) -> Result<u64, ObserverError> {
    if !ms.is_finite() {
        return Err(ObserverError::InvalidDelay(format!("{} is not finite", ms)));
    }
    if ms < 0.0 {
        return Err(ObserverError::InvalidDelay(format!("{} is negative", ms)));
    }
    if ms.fract() != 0.0 {
        return Err(ObserverError::InvalidDelay(format!("{} is not a whole number of milliseconds", ms)));
    }
    if ms > u64::MAX as f64 {
        return Err(ObserverError::InvalidDelay(format!("{} is out of range", ms)));
    }
    Ok(ms as u64)
}

/// `new Observer(element, delay?)`
pub fn construct(window: &Window, args: &[ScriptValue]) -> Result<Observer, ObserverError> {
    let element = match args.first() {
        Some(ScriptValue::Node(id)) => *id,
        other => {
            let got = other.map_or("nothing", ScriptValue::type_name);
            return Err(ObserverError::InvalidElement(format!("expected an element, got {}", got)));
        }
    };

    let delay_ms = match args.get(1) {
        None | Some(ScriptValue::Undefined) => DEFAULT_DELAY_MS,
        Some(ScriptValue::Number(ms)) => delay_from_millis(*ms)?,
        Some(other) => {
            return Err(ObserverError::InvalidDelay(format!("expected a number, got {}", other.type_name())));
        }
    };

    Observer::new(window, element, ObserverOptions::default().with_delay(delay_ms))
}

/// `observer.addAction(when, fn, immediate?)`
pub fn add_action<'a>(observer: &'a Observer, args: &[ScriptValue]) -> Result<&'a Observer, ObserverError> {
    let zone: Zone = match args.first() {
        Some(ScriptValue::String(name)) => name.parse()?,
        other => {
            let got = other.map_or("nothing", ScriptValue::type_name);
            return Err(ObserverError::InvalidZone(got.to_string()));
        }
    };

    let action = match args.get(1) {
        Some(ScriptValue::Function(f)) => f.clone(),
        other => {
            let got = other.map_or("nothing", ScriptValue::type_name);
            return Err(ObserverError::InvalidCallback(got.to_string()));
        }
    };

    let immediate = args.get(2).is_some_and(ScriptValue::is_truthy);
    observer.register(zone, immediate, action);
    Ok(observer)
}

/// `observer.runActions(which)`
pub fn run_actions(observer: &Observer, args: &[ScriptValue]) -> Result<(), ObserverError> {
    match args.first() {
        Some(ScriptValue::String(name)) => observer.run_named_actions(name),
        other => {
            let got = other.map_or("nothing", ScriptValue::type_name);
            Err(ObserverError::InvalidZone(got.to_string()))
        }
    }
}
