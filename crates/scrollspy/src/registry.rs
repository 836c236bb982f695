//! Action registry
//!
//! Ordered callback lists per zone. Insertion order is execution order.

use std::rc::Rc;

use crate::{Element, Zone};

/// Callback registered for a zone. Errors are logged by the dispatcher
/// and never reach the caller.
pub type Action = Rc<dyn Fn(&Element) -> anyhow::Result<()>>;

#[derive(Default)]
pub struct ActionRegistry {
    actions: [Vec<Action>; Zone::COUNT],
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, zone: Zone, action: Action) {
        self.actions[zone.index()].push(action);
    }

    pub fn get(&self, zone: Zone) -> &[Action] {
        &self.actions[zone.index()]
    }

    /// Clone of the list, so callbacks can run without the registry borrowed
    pub fn snapshot(&self, zone: Zone) -> Vec<Action> {
        self.actions[zone.index()].clone()
    }

    pub fn len(&self, zone: Zone) -> usize {
        self.actions[zone.index()].len()
    }

    pub fn total(&self) -> usize {
        self.actions.iter().map(Vec::len).sum()
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for zone in Zone::ALL {
            map.entry(&zone.as_str(), &self.len(zone));
        }
        map.finish()
    }
}
