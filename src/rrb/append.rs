//! Append engine: grows a tree by one element at the tail.

use std::sync::Arc;

use tracing::trace;

use crate::rrb::node::{BRANCHING, Node, NodeRef, Slots};
use crate::rrb::types::BranchTag;

impl<T: Clone> Node<T> {
    /// Appends `value` to the tree rooted at `node` on behalf of `tag`.
    ///
    /// Nodes owned by `tag` are updated in place; every other node on the
    /// right spine is forked, so other versions sharing them are unaffected.
    /// A full tree gains a new root one level taller.
    pub(crate) fn push(node: &mut NodeRef<T>, tag: BranchTag, value: T) {
        if node.is_full() {
            trace!(height = node.height + 1, size = node.size(), "growing tree height");
            let old_root = Arc::clone(node);
            *node = Arc::new(Node::wrap(old_root, tag));
        }
        Node::push_into(node, tag, value);
    }

    /// Appends each of `values` under a single tag.
    pub(crate) fn push_all(node: &mut NodeRef<T>, tag: BranchTag, values: impl IntoIterator<Item = T>) {
        for value in values {
            Node::push(node, tag, value);
        }
    }

    fn push_into(node: &mut NodeRef<T>, tag: BranchTag, value: T) {
        let owned = Node::owned(node, tag);
        let height = owned.height;
        match &mut owned.slots {
            Slots::Leaf(elements) => {
                assert!(elements.len() < BRANCHING, "append into a full leaf");
                elements.push(value);
            }
            Slots::Internal { children, sizes } => {
                let open = children.len().checked_sub(1).filter(|&last| !children[last].is_full());
                match open {
                    Some(last) => {
                        Node::push_into(&mut children[last], tag, value);
                        sizes[last] += 1;
                    }
                    None => {
                        assert!(children.len() < BRANCHING, "append into a full node");
                        let before = sizes.last().copied().unwrap_or(0);
                        children.push(Arc::new(Node::with_element(height - 1, tag, value)));
                        sizes.push(before + 1);
                    }
                }
            }
        }
    }
}
