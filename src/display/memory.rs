//! In-memory display tree backed by a slotmap arena.
//!
//! [`MemoryDisplay`] is a headless [`DisplayAdapter`]: nodes live in a single
//! `SlotMap`, parent/child links in secondary maps. Subtrees cleared out of
//! a container are freed, so the arena holds at most the live tree plus the
//! detached nodes of the cycle in flight.
//!
//! A display built with [`MemoryDisplay::recording`] also keeps a bounded log
//! of recent mutations so callers can see exactly when the live tree changed.

use std::collections::VecDeque;

use slotmap::{new_key_type, SecondaryMap, SlotMap};

use super::DisplayAdapter;

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[DisplayNodeId] = &[];

/// Number of operations a [`MemoryDisplay::recording`] display remembers.
pub const DEFAULT_LOG_CAPACITY: usize = 1024;

new_key_type! {
    /// Unique identifier for a display node. Copy, lightweight (u64).
    pub struct DisplayNodeId;
}

/// What a display node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayNodeKind {
    /// Element node with a tag and attributes in the order they were set.
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    /// Text node.
    Text(String),
}

/// A mutation applied to the display tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayOp {
    CreateElement(DisplayNodeId),
    CreateText(DisplayNodeId),
    SetAttribute(DisplayNodeId),
    Append {
        parent: DisplayNodeId,
        child: DisplayNodeId,
    },
    ClearChildren(DisplayNodeId),
    Release(DisplayNodeId),
}

impl DisplayOp {
    /// Whether this op changed the tree's structure (as opposed to creating
    /// or decorating a detached node).
    pub fn is_attachment(&self) -> bool {
        matches!(self, DisplayOp::Append { .. } | DisplayOp::ClearChildren(_))
    }
}

/// Headless display tree.
pub struct MemoryDisplay {
    nodes: SlotMap<DisplayNodeId, DisplayNodeKind>,
    children: SecondaryMap<DisplayNodeId, Vec<DisplayNodeId>>,
    parent: SecondaryMap<DisplayNodeId, DisplayNodeId>,
    log: VecDeque<DisplayOp>,
    log_capacity: usize,
    attachments: u64,
}

impl MemoryDisplay {
    /// Create an empty display tree that keeps no operation log.
    pub fn new() -> Self {
        Self::with_log(0)
    }

    /// Create an empty display tree that remembers the last
    /// [`DEFAULT_LOG_CAPACITY`] operations.
    pub fn recording() -> Self {
        Self::with_log(DEFAULT_LOG_CAPACITY)
    }

    /// Create an empty display tree that remembers the last `capacity`
    /// operations. Older entries are dropped as new ones arrive.
    pub fn with_log(capacity: usize) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            log: VecDeque::with_capacity(capacity.min(DEFAULT_LOG_CAPACITY)),
            log_capacity: capacity,
            attachments: 0,
        }
    }

    fn record(&mut self, op: DisplayOp) {
        if op.is_attachment() {
            self.attachments += 1;
        }
        if self.log_capacity == 0 {
            return;
        }
        if self.log.len() == self.log_capacity {
            self.log.pop_front();
        }
        self.log.push_back(op);
    }

    fn insert(&mut self, kind: DisplayNodeKind) -> DisplayNodeId {
        let id = self.nodes.insert(kind);
        self.children.insert(id, Vec::new());
        id
    }

    /// Get the node's data.
    pub fn get(&self, id: DisplayNodeId) -> Option<&DisplayNodeKind> {
        self.nodes.get(id)
    }

    /// Get the parent of a node, if it is attached.
    pub fn parent(&self, id: DisplayNodeId) -> Option<DisplayNodeId> {
        self.parent.get(id).copied()
    }

    /// Children of a node. Empty if the node has none or does not exist.
    pub fn children(&self, id: DisplayNodeId) -> &[DisplayNodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Value of attribute `key` on an element node. The last write wins.
    pub fn attribute(&self, id: DisplayNodeId, key: &str) -> Option<&str> {
        match self.nodes.get(id)? {
            DisplayNodeKind::Element { attributes, .. } => attributes
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            DisplayNodeKind::Text(_) => None,
        }
    }

    /// Number of nodes alive in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Recent mutations, oldest first. Always empty unless the display was
    /// built with a log capacity.
    pub fn log(&self) -> &VecDeque<DisplayOp> {
        &self.log
    }

    /// Forget the mutation log and reset the attachment count.
    pub fn clear_log(&mut self) {
        self.log.clear();
        self.attachments = 0;
    }

    /// Number of structural mutations (appends and clears) since creation or
    /// the last [`clear_log`](Self::clear_log). Counted whether or not the
    /// log is enabled.
    pub fn attachments(&self) -> u64 {
        self.attachments
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: DisplayNodeId) -> Vec<DisplayNodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// Serialize the subtree under `id` as compact markup.
    ///
    /// Elements render as `<tag k="v">...</tag>`, text nodes as their raw
    /// string. No escaping is performed.
    pub fn to_markup(&self, id: DisplayNodeId) -> String {
        let mut out = String::new();
        self.write_markup(id, &mut out);
        out
    }

    /// Markup of the children of `id`, concatenated, without `id` itself.
    pub fn inner_markup(&self, id: DisplayNodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_markup(child, &mut out);
        }
        out
    }

    fn write_markup(&self, id: DisplayNodeId, out: &mut String) {
        match self.nodes.get(id) {
            Some(DisplayNodeKind::Text(value)) => out.push_str(value),
            Some(DisplayNodeKind::Element { tag, attributes }) => {
                out.push('<');
                out.push_str(tag);
                for (k, v) in attributes {
                    out.push_str(&format!(" {k}=\"{v}\""));
                }
                out.push('>');
                for &child in self.children(id) {
                    self.write_markup(child, out);
                }
                out.push_str(&format!("</{tag}>"));
            }
            None => {}
        }
    }

    /// Drop `root` and everything below it from the arena.
    fn remove_subtree(&mut self, root: DisplayNodeId) {
        for id in self.walk_depth_first(root) {
            self.children.remove(id);
            self.parent.remove(id);
            self.nodes.remove(id);
        }
    }

    fn detach(&mut self, child: DisplayNodeId) {
        if let Some(old_parent) = self.parent.remove(child) {
            if let Some(siblings) = self.children.get_mut(old_parent) {
                siblings.retain(|&c| c != child);
            }
        }
    }
}

impl Default for MemoryDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayAdapter for MemoryDisplay {
    type Node = DisplayNodeId;

    fn create_element(&mut self, tag: &str) -> DisplayNodeId {
        let id = self.insert(DisplayNodeKind::Element {
            tag: tag.to_owned(),
            attributes: Vec::new(),
        });
        self.record(DisplayOp::CreateElement(id));
        id
    }

    fn create_text(&mut self, text: &str) -> DisplayNodeId {
        let id = self.insert(DisplayNodeKind::Text(text.to_owned()));
        self.record(DisplayOp::CreateText(id));
        id
    }

    fn set_attribute(&mut self, node: DisplayNodeId, key: &str, value: &str) {
        if let Some(DisplayNodeKind::Element { attributes, .. }) = self.nodes.get_mut(node) {
            match attributes.iter_mut().find(|(k, _)| k == key) {
                Some((_, existing)) => *existing = value.to_owned(),
                None => attributes.push((key.to_owned(), value.to_owned())),
            }
            self.record(DisplayOp::SetAttribute(node));
        }
    }

    fn append_child(&mut self, parent: DisplayNodeId, child: DisplayNodeId) {
        debug_assert!(self.nodes.contains_key(parent), "parent node does not exist");
        debug_assert!(self.nodes.contains_key(child), "child node does not exist");

        // Appending an attached node moves it, as in a browser DOM.
        self.detach(child);
        self.parent.insert(child, parent);
        if let Some(kids) = self.children.get_mut(parent) {
            kids.push(child);
        }
        self.record(DisplayOp::Append { parent, child });
    }

    /// Detach and free every child subtree of `node`. Handles into the
    /// cleared subtrees go stale.
    fn clear_children(&mut self, node: DisplayNodeId) {
        let kids = match self.children.get_mut(node) {
            Some(kids) => std::mem::take(kids),
            None => return,
        };
        for child in kids {
            self.parent.remove(child);
            self.remove_subtree(child);
        }
        self.record(DisplayOp::ClearChildren(node));
    }

    fn tag_name(&self, node: DisplayNodeId) -> String {
        match self.nodes.get(node) {
            Some(DisplayNodeKind::Element { tag, .. }) => tag.clone(),
            _ => String::new(),
        }
    }

    fn release(&mut self, node: DisplayNodeId) {
        // Attached nodes belong to the live tree.
        if !self.nodes.contains_key(node) || self.parent.contains_key(node) {
            return;
        }
        self.remove_subtree(node);
        self.record(DisplayOp::Release(node));
    }
}
