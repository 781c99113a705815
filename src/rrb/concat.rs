//! Concat engine: joins two trees while keeping them balanced.
//!
//! Heights are equalized first, then the two right/left spines are merged
//! from the bottom up. At each level the boundary region (the nodes between
//! the untouched parts of both trees) is repacked according to the
//! rebalance plan, so only nodes along the two spines are ever rebuilt.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::rrb::node::{BRANCHING, Node, NodeRef, Slots};
use crate::rrb::plan::plan;
use crate::rrb::types::{BranchTag, fresh_tag};

impl<T: Clone> Node<T> {
    /// Returns a tree holding the elements of `left` followed by those of
    /// `right`. Neither input is modified.
    pub(crate) fn concat(left: &NodeRef<T>, right: &NodeRef<T>) -> NodeRef<T> {
        if right.size() == 0 {
            return Arc::clone(left);
        }
        if left.size() == 0 {
            return Arc::clone(right);
        }
        debug!(
            left_size = left.size(),
            left_height = left.height,
            right_size = right.size(),
            right_height = right.height,
            "concatenating trees"
        );

        if let Slots::Leaf(elements) = &right.slots {
            let tag = fresh_tag();
            let mut root = Arc::clone(left);
            Node::push_all(&mut root, tag, elements.iter().cloned());
            Node::persist(&mut root, tag);
            return root;
        }

        let mut left = Arc::clone(left);
        let mut right = Arc::clone(right);
        while left.height < right.height {
            left = Arc::new(Node::wrap(left, BranchTag::PERSISTENT));
        }
        while right.height < left.height {
            right = Arc::new(Node::wrap(right, BranchTag::PERSISTENT));
        }

        let mut level = merge(&left, &right);
        let mut height = left.height;
        while level.len() > 1 {
            height += 1;
            level = pack(level, height);
        }
        match level.pop() {
            Some(root) => Node::collapse(root),
            None => unreachable!("merge of non-empty trees produced no nodes"),
        }
    }
}

/// Merges two internal nodes of equal height into a list of siblings of
/// that height.
fn merge<T: Clone>(left: &Node<T>, right: &Node<T>) -> Vec<NodeRef<T>> {
    let (Slots::Internal { children: lc, .. }, Slots::Internal { children: rc, .. }) =
        (&left.slots, &right.slots)
    else {
        unreachable!("merge expects internal nodes");
    };
    let height = left.height;

    let mut region = Vec::with_capacity(lc.len() + rc.len() + 2);
    if height == 1 {
        region.extend(lc.iter().cloned());
        region.extend(rc.iter().cloned());
    } else {
        let (Some((left_last, left_rest)), Some((right_first, right_rest))) =
            (lc.split_last(), rc.split_first())
        else {
            unreachable!("merge of an empty node");
        };
        region.extend(left_rest.iter().cloned());
        region.extend(merge(left_last, right_first));
        region.extend(right_rest.iter().cloned());
    }

    pack(rebalance(region, height - 1), height)
}

/// Repacks sibling nodes of `height` according to the rebalance plan for
/// their total slot count.
///
/// Nodes whose size the plan still calls for are kept as they are while no
/// repack is in progress; all other slots stream into new nodes.
fn rebalance<T: Clone>(nodes: Vec<NodeRef<T>>, height: usize) -> Vec<NodeRef<T>> {
    let total: usize = nodes.iter().map(|node| node.len()).sum();
    let Some(mut budget) = plan(total) else {
        return nodes;
    };
    if budget.node_count() >= nodes.len() {
        return nodes;
    }
    trace!(
        height,
        total,
        from = nodes.len(),
        to = budget.node_count(),
        "repacking boundary region"
    );

    let mut packed = Vec::with_capacity(budget.node_count());
    let mut pending: Option<(Node<T>, usize)> = None;
    for node in nodes {
        if pending.is_none() && budget.claim(node.len()) {
            packed.push(node);
            continue;
        }
        let mut offset = 0;
        while offset < node.len() {
            let (open, target) = pending.get_or_insert_with(|| {
                (Node::empty(height, BranchTag::PERSISTENT), budget.next_node())
            });
            let count = (*target - open.len()).min(node.len() - offset);
            open.extend_from(&node, offset..offset + count);
            offset += count;
            if open.len() == *target {
                if let Some((done, _)) = pending.take() {
                    packed.push(Arc::new(done));
                }
            }
        }
    }
    debug_assert!(pending.is_none(), "rebalance left a partial node");
    packed
}

/// Groups siblings into parents of `height`, at most `BRANCHING` children
/// each, filling from the left.
fn pack<T>(nodes: Vec<NodeRef<T>>, height: usize) -> Vec<NodeRef<T>> {
    nodes
        .chunks(BRANCHING)
        .map(|chunk| Arc::new(Node::from_children(height, BranchTag::PERSISTENT, chunk.iter().cloned())))
        .collect()
}
