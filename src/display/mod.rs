//! Display adapter: the host-side sink the reconciler writes into.
//!
//! The reconciler never reads the display tree back. It only creates nodes,
//! sets attributes and appends children, all through [`DisplayAdapter`].

pub mod memory;

pub use memory::{DisplayNodeId, DisplayNodeKind, DisplayOp, MemoryDisplay, DEFAULT_LOG_CAPACITY};

use std::fmt::Debug;

/// Primitive display-tree operations supplied by the host environment.
pub trait DisplayAdapter {
    /// Handle to a live display node. Handles are bound to fibers, so they
    /// must be cheap to copy.
    type Node: Copy + Eq + Debug;

    /// Create a detached element node of the given tag kind.
    fn create_element(&mut self, tag: &str) -> Self::Node;

    /// Create a detached text node holding `text`.
    fn create_text(&mut self, text: &str) -> Self::Node;

    /// Set attribute `key` to `value` on `node`.
    fn set_attribute(&mut self, node: Self::Node, key: &str, value: &str);

    /// Append `child` as the last child of `parent`.
    fn append_child(&mut self, parent: Self::Node, child: Self::Node);

    /// Detach every current child of `node`.
    fn clear_children(&mut self, node: Self::Node);

    /// The tag name of an element node, used to describe a mount point.
    fn tag_name(&self, node: Self::Node) -> String;

    /// Called for a detached node that will never be attached, because the
    /// cycle that created it was abandoned. Adapters that own their nodes
    /// can free it here.
    fn release(&mut self, _node: Self::Node) {}
}
