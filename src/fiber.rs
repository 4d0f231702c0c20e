//! Fiber arena: the mutable work tree built during a render cycle.
//!
//! Fibers live in a `SlotMap` owned by the reconciler. `parent`, `child` and
//! `sibling` are plain keys into that arena, so the tree has no ownership
//! cycles; clearing the arena discards the whole cycle at once.

use slotmap::{new_key_type, SlotMap};

use crate::element::{Element, ElementKind};

new_key_type! {
    /// Handle to a fiber in a [`FiberTree`].
    pub struct FiberId;
}

/// What a fiber represents.
#[derive(Debug, Clone)]
pub enum FiberPayload {
    /// The synthetic fiber standing in for the mount point. Its display node
    /// is the container itself, and it is never attached anywhere.
    Root { tag: String, children: Vec<Element> },
    /// A fiber for one element position. Holds a shared handle to the source
    /// element, whose kind and children are read during the render phase.
    Element(Element),
}

impl FiberPayload {
    /// Whether this fiber renders a text node.
    pub fn is_text(&self) -> bool {
        matches!(self, FiberPayload::Element(el) if el.is_text())
    }

    /// Declared children to expand. Text fibers never have any, even if the
    /// source element carried some.
    pub fn children(&self) -> &[Element] {
        match self {
            FiberPayload::Root { children, .. } => children,
            FiberPayload::Element(el) => match el.kind() {
                ElementKind::Host { .. } => el.children(),
                ElementKind::Text(_) => &[],
            },
        }
    }

    /// Tag of a root or host fiber.
    pub fn tag(&self) -> Option<&str> {
        match self {
            FiberPayload::Root { tag, .. } => Some(tag),
            FiberPayload::Element(el) => el.tag(),
        }
    }
}

/// One node of the work tree.
#[derive(Debug)]
pub struct Fiber<N> {
    pub payload: FiberPayload,
    pub parent: Option<FiberId>,
    pub child: Option<FiberId>,
    pub sibling: Option<FiberId>,
    display: Option<N>,
}

impl<N: Copy> Fiber<N> {
    fn new(payload: FiberPayload, parent: Option<FiberId>) -> Self {
        Self {
            payload,
            parent,
            child: None,
            sibling: None,
            display: None,
        }
    }

    /// The bound display node, if the render phase has visited this fiber.
    pub fn display(&self) -> Option<N> {
        self.display
    }

    /// Bind a display node. Binding is permanent: once set, later calls are
    /// ignored and return `false`.
    pub fn bind_display(&mut self, node: N) -> bool {
        if self.display.is_some() {
            return false;
        }
        self.display = Some(node);
        true
    }
}

/// Arena holding every fiber of the cycle in flight.
#[derive(Debug)]
pub struct FiberTree<N> {
    fibers: SlotMap<FiberId, Fiber<N>>,
}

impl<N: Copy> FiberTree<N> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self {
            fibers: SlotMap::with_key(),
        }
    }

    /// Insert the synthetic root fiber for a mount point whose display node
    /// is `container`.
    pub fn insert_root(&mut self, tag: String, element: Element, container: N) -> FiberId {
        let mut root = Fiber::new(
            FiberPayload::Root {
                tag,
                children: vec![element],
            },
            None,
        );
        root.display = Some(container);
        self.fibers.insert(root)
    }

    /// Create one child fiber per declared child of `parent`, linked as
    /// `parent.child -> sibling -> sibling ...` in declaration order.
    ///
    /// Returns the number of fibers created.
    pub fn expand_children(&mut self, parent: FiberId) -> usize {
        let elements: Vec<Element> = match self.fibers.get(parent) {
            Some(fiber) => fiber.payload.children().to_vec(),
            None => return 0,
        };

        let mut prev: Option<FiberId> = None;
        for element in &elements {
            let id = self
                .fibers
                .insert(Fiber::new(FiberPayload::Element(element.clone()), Some(parent)));
            match prev {
                None => self.fibers[parent].child = Some(id),
                Some(prev_id) => self.fibers[prev_id].sibling = Some(id),
            }
            prev = Some(id);
        }
        elements.len()
    }

    /// The fiber to visit after `id` in pre-order: its first child, else the
    /// first sibling found walking up from `id` through its ancestors.
    pub fn next_after(&self, id: FiberId) -> Option<FiberId> {
        let fiber = self.fibers.get(id)?;
        if let Some(child) = fiber.child {
            return Some(child);
        }
        let mut current = Some(id);
        while let Some(cur) = current {
            let fiber = &self.fibers[cur];
            if let Some(sibling) = fiber.sibling {
                return Some(sibling);
            }
            current = fiber.parent;
        }
        None
    }

    /// Iterate the child chain of `id` (first child, then its siblings).
    pub fn children(&self, id: FiberId) -> ChildIter<'_, N> {
        ChildIter {
            tree: self,
            next: self.fibers.get(id).and_then(|f| f.child),
        }
    }

    /// Immutable access to a fiber.
    pub fn get(&self, id: FiberId) -> Option<&Fiber<N>> {
        self.fibers.get(id)
    }

    /// Mutable access to a fiber.
    pub fn get_mut(&mut self, id: FiberId) -> Option<&mut Fiber<N>> {
        self.fibers.get_mut(id)
    }

    /// Whether `id` is alive in this arena.
    pub fn contains(&self, id: FiberId) -> bool {
        self.fibers.contains_key(id)
    }

    /// Number of fibers in the arena.
    pub fn len(&self) -> usize {
        self.fibers.len()
    }

    /// Whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.fibers.is_empty()
    }

    /// Drop every fiber.
    pub fn clear(&mut self) {
        self.fibers.clear();
    }

    /// Iterate all fibers, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (FiberId, &Fiber<N>)> + '_ {
        self.fibers.iter()
    }
}

impl<N: Copy> Default for FiberTree<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a fiber's child chain. See [`FiberTree::children`].
pub struct ChildIter<'a, N> {
    tree: &'a FiberTree<N>,
    next: Option<FiberId>,
}

impl<N: Copy> Iterator for ChildIter<'_, N> {
    type Item = FiberId;

    fn next(&mut self) -> Option<FiberId> {
        let id = self.next?;
        self.next = self.tree.get(id).and_then(|f| f.sibling);
        Some(id)
    }
}
