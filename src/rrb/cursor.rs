//! Forward traversal over a tree.
//!
//! [`Cursor`] owns handles to the nodes it walks, so it stays valid no matter
//! what happens to the vector it came from. [`Iter`] borrows the vector and
//! streams one leaf at a time.

use std::fmt;
use std::iter::FusedIterator;
use std::sync::Arc;

use crate::rrb::node::{Node, NodeRef, Slots};

/// A forward cursor holding the path from the root to the current leaf.
pub struct Cursor<T> {
    /// Internal nodes above the current leaf, root first, each with the slot
    /// the path descends through.
    stack: Vec<(NodeRef<T>, usize)>,
    leaf: Option<NodeRef<T>>,
    offset: usize,
    remaining: usize,
}

impl<T> Cursor<T> {
    /// Positions a cursor at element `start`. Requires `start <= size`.
    pub(crate) fn new(root: &NodeRef<T>, start: usize) -> Self {
        let size = root.size();
        debug_assert!(start <= size);
        let mut cursor = Cursor {
            stack: Vec::with_capacity(root.height),
            leaf: None,
            offset: 0,
            remaining: size.saturating_sub(start),
        };
        if start < size {
            cursor.descend(Arc::clone(root), start);
        }
        cursor
    }

    /// Number of elements left to yield.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Walks from `node` down to the leaf holding `index`, pushing frames.
    fn descend(&mut self, mut node: NodeRef<T>, mut index: usize) {
        loop {
            let next = match &node.slots {
                Slots::Leaf(_) => break,
                Slots::Internal { children, .. } => {
                    let (slot, local) = node.locate(index);
                    index = local;
                    (Arc::clone(&children[slot]), slot)
                }
            };
            self.stack.push((node, next.1));
            node = next.0;
        }
        self.leaf = Some(node);
        self.offset = index;
    }

    /// Moves to the first element of the next leaf, or past the end.
    fn advance_leaf(&mut self) {
        self.leaf = None;
        while let Some((parent, slot)) = self.stack.pop() {
            if slot + 1 < parent.len() {
                let next = match &parent.slots {
                    Slots::Internal { children, .. } => Arc::clone(&children[slot + 1]),
                    Slots::Leaf(_) => unreachable!("leaf on the cursor stack"),
                };
                self.stack.push((parent, slot + 1));
                self.descend(next, 0);
                return;
            }
        }
    }
}

impl<T: Clone> Iterator for Cursor<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let leaf = self.leaf.as_ref()?;
        let Slots::Leaf(elements) = &leaf.slots else {
            unreachable!("cursor positioned on an internal node");
        };
        let value = elements.get(self.offset)?.clone();
        self.offset += 1;
        self.remaining -= 1;
        if self.offset == elements.len() {
            self.advance_leaf();
        }
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Clone> ExactSizeIterator for Cursor<T> {}

impl<T> fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("depth", &self.stack.len())
            .field("offset", &self.offset)
            .field("remaining", &self.remaining)
            .finish()
    }
}

impl<T: Clone> FusedIterator for Cursor<T> {}

/// Borrowing iterator yielding references, one leaf chunk at a time.
pub struct Iter<'a, T> {
    root: &'a Node<T>,
    chunk: std::slice::Iter<'a, T>,
    position: usize,
    end: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(root: &'a Node<T>) -> Self {
        Iter {
            root,
            chunk: Default::default(),
            position: 0,
            end: root.size(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if let Some(value) = self.chunk.next() {
            return Some(value);
        }
        if self.position >= self.end {
            return None;
        }
        let (chunk, _) = self.root.read_from(self.position)?;
        self.position += chunk.len();
        self.chunk = chunk.iter();
        self.chunk.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.chunk.len() + (self.end - self.position);
        (left, Some(left))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("position", &(self.position - self.chunk.len()))
            .field("end", &self.end)
            .finish()
    }
}
