//! Element handle passed to actions

use scrollspy_host::{HostError, NodeId, Window};

/// Non-owning reference to the tracked element. The document owns the node;
/// this only names it.
#[derive(Debug, Clone)]
pub struct Element {
    window: Window,
    node: NodeId,
}

impl Element {
    pub(crate) fn new(window: Window, node: NodeId) -> Self {
        Self { window, node }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.window
            .document()
            .class_list(self.node)
            .is_ok_and(|list| list.contains(class))
    }

    /// Force a class on or off
    pub fn toggle_class(&self, class: &str, on: bool) -> Result<(), HostError> {
        self.window
            .document_mut()
            .class_list_mut(self.node)?
            .toggle(class, Some(on));
        Ok(())
    }
}
