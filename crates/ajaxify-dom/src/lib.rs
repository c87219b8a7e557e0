//! Ajaxify DOM - Document Object Model
//!
//! Arena-based DOM tree with the pieces the request layer reads from:
//! attributes, form controls and delegated event listeners.

mod node;
mod tree;
mod document;
pub mod forms;
pub mod events;
pub mod listeners;

pub use node::{Node, NodeData, ElementData, Attribute};
pub use tree::{DomTree, Children, Ancestors};
pub use document::Document;
pub use forms::{FormData, FormDataValue, FileEntry, form_owner};
pub use events::{DomEvent, EventType};
pub use listeners::{ElementMatcher, EventHandler, EventListeners, ListenerId};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Document node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID refers to a node
    #[inline]
    pub fn is_valid(&self) -> bool {
        *self != Self::NONE
    }

    /// Raw arena index
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}
