//! The persistent RRB vector.
//!
//! This module contains the public, immutable sequence type. Every operation
//! returns a new vector; the receiver keeps its contents and shares all
//! untouched nodes with the result.

use std::fmt;
use std::sync::Arc;

use crate::error::{Result, SequenceError};
use crate::rrb::cursor::{Cursor, Iter};
use crate::rrb::node::{Node, NodeRef};
use crate::rrb::transient::TransientVector;
use crate::rrb::types::{BranchTag, fresh_tag};

/// A persistent sequence backed by a relaxed radix-balanced tree.
///
/// # Design
///
/// - Nodes are reference counted and shared between versions
/// - Updates copy only the path from the root to the changed leaf
/// - Bulk construction goes through a [`TransientVector`] session
/// - Cloning a vector is O(1)
pub struct RrbVector<T> {
    root: NodeRef<T>,
}

impl<T> Clone for RrbVector<T> {
    fn clone(&self) -> Self {
        RrbVector {
            root: Arc::clone(&self.root),
        }
    }
}

impl<T: Clone> RrbVector<T> {
    /// Creates an empty vector.
    pub fn new() -> Self {
        Self::with_height(0)
    }

    /// Creates an empty vector whose root sits at `height`.
    ///
    /// Mostly useful for tests; the root collapses as soon as the vector is
    /// sliced or concatenated.
    pub fn with_height(height: usize) -> Self {
        RrbVector {
            root: Arc::new(Node::empty(height, BranchTag::PERSISTENT)),
        }
    }

    /// Builds a vector holding a copy of `values`.
    pub fn from_slice(values: &[T]) -> Self {
        values.iter().cloned().collect()
    }

    pub(crate) fn from_root(root: NodeRef<T>) -> Self {
        RrbVector { root }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.root.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Height of the tree (0 when the root is a leaf).
    pub fn height(&self) -> usize {
        self.root.height
    }

    /// Whether appending one more element requires a taller tree.
    pub fn is_full(&self) -> bool {
        self.root.is_full()
    }

    /// Returns a new vector with `value` appended.
    pub fn push_back(&self, value: T) -> Self {
        let mut root = Arc::clone(&self.root);
        Node::push(&mut root, BranchTag::PERSISTENT, value);
        RrbVector { root }
    }

    /// Returns a new vector with all `values` appended.
    ///
    /// The values are appended in a single transient session, so nodes on
    /// the right spine are copied once rather than once per element.
    pub fn append_all<I: IntoIterator<Item = T>>(&self, values: I) -> Self {
        let mut session = self.transient();
        session.extend(values);
        session.persistent()
    }

    /// Gets a reference to the element at `index`.
    ///
    /// # Returns
    ///
    /// * `Ok(&T)` - The element
    /// * `Err(SequenceError::OutOfRange)` - If `index >= len()`
    pub fn get(&self, index: usize) -> Result<&T> {
        self.root.get(index).ok_or(SequenceError::OutOfRange {
            index,
            len: self.len(),
        })
    }

    /// Returns the rest of the leaf holding `index` and whether more elements
    /// follow it. The next chunk starts at `index + slice.len()`.
    ///
    /// At `index == len()` the slice is empty.
    ///
    /// # Returns
    ///
    /// * `Err(SequenceError::EndOfSequence)` - If `index > len()`
    pub fn read_from(&self, index: usize) -> Result<(&[T], bool)> {
        self.root.read_from(index).ok_or(SequenceError::EndOfSequence {
            index,
            len: self.len(),
        })
    }

    /// Copies elements starting at `index` into `buf` and returns how many
    /// were copied, which is less than `buf.len()` only at the end of the
    /// vector.
    pub fn read_into(&self, index: usize, buf: &mut [T]) -> Result<usize> {
        self.root.read_into(index, buf).ok_or(SequenceError::EndOfSequence {
            index,
            len: self.len(),
        })
    }

    /// Returns the first `index` elements.
    pub fn take(&self, index: usize) -> Result<Self> {
        self.check_cut(index)?;
        let mut root = Arc::clone(&self.root);
        Node::take(&mut root, BranchTag::PERSISTENT, index);
        Ok(Self::from_root(root))
    }

    /// Returns the elements from `index` on.
    pub fn drop(&self, index: usize) -> Result<Self> {
        self.check_cut(index)?;
        let mut root = Arc::clone(&self.root);
        Node::drop(&mut root, BranchTag::PERSISTENT, index);
        Ok(Self::from_root(root))
    }

    /// Splits the vector into `take(index)` and `drop(index)`.
    pub fn split_at(&self, index: usize) -> Result<(Self, Self)> {
        Ok((self.take(index)?, self.drop(index)?))
    }

    /// Returns a vector holding the elements of `self` followed by those of
    /// `other`. Both inputs are left untouched.
    pub fn concat(&self, other: &Self) -> Self {
        Self::from_root(Node::concat(&self.root, &other.root))
    }

    /// A cursor yielding clones of the elements from `start` on.
    ///
    /// # Returns
    ///
    /// * `Err(SequenceError::EndOfSequence)` - If `start > len()`
    pub fn cursor(&self, start: usize) -> Result<Cursor<T>> {
        if start > self.len() {
            return Err(SequenceError::EndOfSequence {
                index: start,
                len: self.len(),
            });
        }
        Ok(Cursor::new(&self.root, start))
    }

    /// Iterates over references to the elements.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.root)
    }

    /// Opens a transient session starting from this vector's contents.
    pub fn transient(&self) -> TransientVector<T> {
        let tag = fresh_tag();
        TransientVector::from_parts(Arc::new(self.root.fork(tag)), tag)
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Renders the tree structure, one node per line (for debugging).
    pub fn dump_tree(&self) -> String {
        let mut out = String::new();
        self.root.dump(0, &mut out);
        out
    }

    /// Panics if a structural invariant of the tree is broken.
    pub fn check_invariants(&self) {
        self.root.check_invariants(true);
        assert!(self.root.branch.is_persistent(), "published root is still transient");
    }

    fn check_cut(&self, index: usize) -> Result<()> {
        if index > self.len() {
            return Err(SequenceError::OutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(())
    }
}

impl<T: Clone> Default for RrbVector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> FromIterator<T> for RrbVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut session = TransientVector::new();
        session.extend(iter);
        session.persistent()
    }
}

impl<'a, T: Clone> IntoIterator for &'a RrbVector<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Clone + PartialEq> PartialEq for RrbVector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Clone + Eq> Eq for RrbVector<T> {}

impl<T: Clone + fmt::Debug> fmt::Debug for RrbVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
