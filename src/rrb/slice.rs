//! Slice engine: prefix (take) and suffix (drop) of a tree.
//!
//! The recursive helpers keep every node at its height so siblings stay
//! uniform; only the root collapses once the cut is done.

use std::sync::Arc;

use crate::rrb::node::{Node, NodeRef, Slots};
use crate::rrb::types::BranchTag;

impl<T: Clone> Node<T> {
    /// Cuts `root` down to its first `index` elements. Requires
    /// `index <= size`.
    pub(crate) fn take(root: &mut NodeRef<T>, tag: BranchTag, index: usize) {
        debug_assert!(index <= root.size());
        if index == 0 {
            *root = Arc::new(Node::empty(0, tag));
            return;
        }
        Node::take_in(root, tag, index);
        *root = Node::collapse(Arc::clone(root));
    }

    /// Cuts the first `index` elements off `root`. Requires `index <= size`.
    pub(crate) fn drop(root: &mut NodeRef<T>, tag: BranchTag, index: usize) {
        debug_assert!(index <= root.size());
        if index == root.size() {
            *root = Arc::new(Node::empty(0, tag));
            return;
        }
        Node::drop_in(root, tag, index);
        *root = Node::collapse(Arc::clone(root));
    }

    /// Cuts `node` down to its first `index` elements, `0 < index`.
    fn take_in(node: &mut NodeRef<T>, tag: BranchTag, index: usize) {
        if index >= node.size() {
            return;
        }
        let (slot, local) = node.locate_end(index);
        let owned = Node::owned(node, tag);
        match &mut owned.slots {
            Slots::Leaf(elements) => elements.truncate(index),
            Slots::Internal { children, sizes } => {
                children.truncate(slot + 1);
                sizes.truncate(slot + 1);
                Node::take_in(&mut children[slot], tag, local);
                sizes[slot] = index;
            }
        }
    }

    /// Removes the first `index` elements of `node`, `index < size`.
    fn drop_in(node: &mut NodeRef<T>, tag: BranchTag, index: usize) {
        if index == 0 {
            return;
        }
        let (slot, local) = node.locate(index);
        let owned = Node::owned(node, tag);
        match &mut owned.slots {
            Slots::Leaf(elements) => {
                elements.drain(..index);
            }
            Slots::Internal { children, .. } => {
                children.drain(..slot);
                Node::drop_in(&mut children[0], tag, local);
            }
        }
        owned.resize();
    }
}
