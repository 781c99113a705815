//! Node definition and related constants for the RRB-tree.
//!
//! A node is either a leaf holding up to [`BRANCHING`] elements or an internal
//! node holding up to [`BRANCHING`] children together with the cumulative
//! element count covered by each prefix of its children.

use std::fmt::Write as _;
use std::ops::Range;
use std::sync::Arc;

use crate::rrb::types::BranchTag;

/// Number of index bits consumed per tree level.
pub const BITS: usize = 5;

/// Maximum number of elements per leaf and children per internal node.
pub const BRANCHING: usize = 1 << BITS;

/// Shared handle to a node. Nodes are shared between every version that can
/// reach them and freed with the last one.
pub(crate) type NodeRef<T> = Arc<Node<T>>;

/// The occupied slots of a node.
#[derive(Debug, Clone)]
pub(crate) enum Slots<T> {
    Leaf(Vec<T>),
    Internal {
        children: Vec<NodeRef<T>>,
        /// `sizes[i]` is the element count of `children[..=i]`.
        sizes: Vec<usize>,
    },
}

/// A single tree node at a given height (0 = leaf).
#[derive(Debug)]
pub(crate) struct Node<T> {
    pub(crate) height: usize,
    pub(crate) branch: BranchTag,
    pub(crate) slots: Slots<T>,
}

impl<T> Node<T> {
    /// Creates an empty node branded with `branch`.
    pub(crate) fn empty(height: usize, branch: BranchTag) -> Self {
        let slots = if height == 0 {
            Slots::Leaf(Vec::with_capacity(BRANCHING))
        } else {
            Slots::Internal {
                children: Vec::with_capacity(BRANCHING),
                sizes: Vec::with_capacity(BRANCHING),
            }
        };
        Node {
            height,
            branch,
            slots,
        }
    }

    /// Creates a node one level above `child` with `child` as its only slot.
    pub(crate) fn wrap(child: NodeRef<T>, branch: BranchTag) -> Self {
        let mut node = Node::empty(child.height + 1, branch);
        node.push_child(child);
        node
    }

    /// Builds the minimal single-path subtree of `height` holding `value`.
    pub(crate) fn with_element(height: usize, branch: BranchTag, value: T) -> Self {
        let mut node = Node::empty(0, branch);
        if let Slots::Leaf(elements) = &mut node.slots {
            elements.push(value);
        }
        for _ in 0..height {
            node = Node::wrap(Arc::new(node), branch);
        }
        node
    }

    /// Builds an internal node of `height` over `children`.
    pub(crate) fn from_children(
        height: usize,
        branch: BranchTag,
        children: impl IntoIterator<Item = NodeRef<T>>,
    ) -> Self {
        let mut node = Node::empty(height, branch);
        for child in children {
            node.push_child(child);
        }
        node
    }

    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self.slots, Slots::Leaf(_))
    }

    /// Number of occupied slots.
    pub(crate) fn len(&self) -> usize {
        match &self.slots {
            Slots::Leaf(elements) => elements.len(),
            Slots::Internal { children, .. } => children.len(),
        }
    }

    /// Number of elements stored in this subtree.
    pub(crate) fn size(&self) -> usize {
        match &self.slots {
            Slots::Leaf(elements) => elements.len(),
            Slots::Internal { sizes, .. } => sizes.last().copied().unwrap_or(0),
        }
    }

    /// A leaf is full at `BRANCHING` elements; an internal node is full when
    /// it has `BRANCHING` children and its last child is full.
    pub(crate) fn is_full(&self) -> bool {
        match &self.slots {
            Slots::Leaf(elements) => elements.len() == BRANCHING,
            Slots::Internal { children, .. } => {
                children.len() == BRANCHING && children.last().is_some_and(|c| c.is_full())
            }
        }
    }

    /// Appends `child` as the last slot of an internal node.
    pub(crate) fn push_child(&mut self, child: NodeRef<T>) {
        debug_assert_eq!(child.height + 1, self.height, "child height mismatch");
        match &mut self.slots {
            Slots::Internal { children, sizes } => {
                assert!(children.len() < BRANCHING, "internal node overflow");
                let before = sizes.last().copied().unwrap_or(0);
                sizes.push(before + child.size());
                children.push(child);
            }
            Slots::Leaf(_) => unreachable!("push_child on a leaf"),
        }
    }

    /// Element count covered by the children before slot `i`.
    pub(crate) fn size_before(&self, i: usize) -> usize {
        match &self.slots {
            Slots::Internal { sizes, .. } if i > 0 => sizes[i - 1],
            _ => 0,
        }
    }

    /// Finds the child holding element `index`: the first slot whose
    /// cumulative size exceeds `index`. Returns the slot and the index local
    /// to that child.
    pub(crate) fn locate(&self, index: usize) -> (usize, usize) {
        let Slots::Internal { sizes, .. } = &self.slots else {
            return (0, index);
        };
        // A child of this node holds at most BRANCHING^height elements, so the
        // radix estimate never lands past the answer.
        let mut i = index
            .checked_shr((BITS * self.height) as u32)
            .unwrap_or(0)
            .min(sizes.len().saturating_sub(1));
        while i + 1 < sizes.len() && sizes[i] <= index {
            i += 1;
        }
        (i, index - self.size_before(i))
    }

    /// Finds the child holding the `index`-th element counted from one: the
    /// first slot whose cumulative size reaches `index`. Used when cutting
    /// after `index` elements so the kept part of the child is never empty.
    pub(crate) fn locate_end(&self, index: usize) -> (usize, usize) {
        debug_assert!(index > 0);
        let (i, local) = self.locate(index - 1);
        (i, local + 1)
    }

    /// Recomputes the cumulative sizes from the children.
    pub(crate) fn resize(&mut self) {
        if let Slots::Internal { children, sizes } = &mut self.slots {
            sizes.clear();
            let mut total = 0;
            for child in children.iter() {
                total += child.size();
                sizes.push(total);
            }
        }
    }

    /// Rewrites `tag` to persistent on every node still owned by `tag`.
    /// Nodes outside the session were never branded and are left alone.
    pub(crate) fn persist(node: &mut NodeRef<T>, tag: BranchTag) {
        if tag.is_persistent() || node.branch != tag {
            return;
        }
        let Some(owned) = Arc::get_mut(node) else {
            debug_assert!(false, "node of session {tag} is shared outside the session");
            return;
        };
        owned.branch = BranchTag::PERSISTENT;
        if let Slots::Internal { children, .. } = &mut owned.slots {
            for child in children.iter_mut() {
                Node::persist(child, tag);
            }
        }
    }

    /// Replaces a root that has a single child by that child until the root
    /// is a leaf or has at least two children.
    pub(crate) fn collapse(mut root: NodeRef<T>) -> NodeRef<T> {
        loop {
            let child = match &root.slots {
                Slots::Internal { children, .. } if children.len() == 1 => Arc::clone(&children[0]),
                _ => return root,
            };
            root = child;
        }
    }

    /// Renders the subtree, one line per node, indented by depth.
    pub(crate) fn dump(&self, depth: usize, out: &mut String) {
        let _ = write!(
            out,
            "{:indent$}h:{} branch:{} len:{}",
            "",
            self.height,
            self.branch,
            self.len(),
            indent = depth * 2
        );
        match &self.slots {
            Slots::Leaf(_) => out.push('\n'),
            Slots::Internal { children, sizes } => {
                let _ = writeln!(out, " sizes:{:?}", sizes);
                for child in children {
                    child.dump(depth + 1, out);
                }
            }
        }
    }

    /// Panics if a structural invariant does not hold below this node.
    pub(crate) fn check_invariants(&self, is_root: bool) {
        assert!(self.len() <= BRANCHING, "node holds {} slots", self.len());
        if !is_root {
            assert!(self.len() > 0, "empty non-root node at height {}", self.height);
        }
        assert_eq!(self.is_leaf(), self.height == 0, "slot kind at height {}", self.height);
        if let Slots::Internal { children, sizes } = &self.slots {
            assert_eq!(children.len(), sizes.len(), "cumulative size table length");
            let mut total = 0;
            for (child, &cumulative) in children.iter().zip(sizes) {
                assert_eq!(child.height + 1, self.height, "uneven child height");
                total += child.size();
                assert_eq!(total, cumulative, "cumulative size mismatch");
                child.check_invariants(false);
            }
        }
    }
}

impl<T: Clone> Node<T> {
    /// Copies this node's slots into a new node branded `branch`. Children
    /// are shared, not copied.
    pub(crate) fn fork(&self, branch: BranchTag) -> Self {
        let slots = match &self.slots {
            Slots::Leaf(elements) => {
                let mut copy = Vec::with_capacity(BRANCHING);
                copy.extend_from_slice(elements);
                Slots::Leaf(copy)
            }
            Slots::Internal { children, sizes } => {
                let mut child_copy = Vec::with_capacity(BRANCHING);
                child_copy.extend(children.iter().cloned());
                let mut size_copy = Vec::with_capacity(BRANCHING);
                size_copy.extend_from_slice(sizes);
                Slots::Internal {
                    children: child_copy,
                    sizes: size_copy,
                }
            }
        };
        Node {
            height: self.height,
            branch,
            slots,
        }
    }

    /// Returns a mutable view of `node` for the session owning `tag`.
    ///
    /// The node is mutated in place only when it carries `tag` and no other
    /// version holds it; otherwise it is replaced by a fork branded `tag`.
    pub(crate) fn owned(node: &mut NodeRef<T>, tag: BranchTag) -> &mut Node<T> {
        let in_place = !tag.is_persistent() && node.branch == tag && Arc::get_mut(node).is_some();
        if !in_place {
            *node = Arc::new(node.fork(tag));
        }
        match Arc::get_mut(node) {
            Some(owned) => owned,
            None => unreachable!("forked node is uniquely held"),
        }
    }

    /// Appends the slots `range` of `source` to this node.
    pub(crate) fn extend_from(&mut self, source: &Node<T>, range: Range<usize>) {
        match &source.slots {
            Slots::Leaf(from) => {
                let Slots::Leaf(elements) = &mut self.slots else {
                    unreachable!("slot kinds differ");
                };
                assert!(elements.len() + range.len() <= BRANCHING, "leaf overflow");
                elements.extend_from_slice(&from[range]);
            }
            Slots::Internal { children, .. } => {
                for child in &children[range] {
                    self.push_child(Arc::clone(child));
                }
            }
        }
    }
}
