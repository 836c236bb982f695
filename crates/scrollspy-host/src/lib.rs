//! scrollspy host - Document and scroll environment
//!
//! A small page model that observers run against: an arena of nodes with
//! layout boxes, a scrollable viewport, additive scroll listeners and a
//! virtual-clock event loop for timers and macrotasks.

mod classlist;
mod document;
mod event_loop;
mod events;
mod geometry;
mod window;

pub use classlist::DOMTokenList;
pub use document::{Document, ElementData, Node, NodeData};
pub use event_loop::{EventLoop, TimerId};
pub use events::{ListenerId, ListenerOptions, ScrollEvent, ScrollListeners};
pub use geometry::{DOMRect, Viewport};
pub use window::Window;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Build an ID from a raw arena index.
    ///
    /// The ID is not checked against any document; lookups with an index
    /// that was never allocated simply miss.
    pub fn from_raw(index: u32) -> Self {
        NodeId(index)
    }

    /// Raw arena index
    pub fn index(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Host errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("No node with id {0}")]
    NoSuchNode(NodeId),

    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),
}
