//! Transient (bulk-build) sessions.
//!
//! A [`TransientVector`] owns a fresh branch tag and the nodes branded with
//! it. Those nodes are updated in place, so building a vector of `n`
//! elements allocates roughly `n / BRANCHING` leaves instead of copying the
//! right spine on every append. [`TransientVector::persistent`] commits the
//! session by clearing the tag.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::error::{Result, SequenceError};
use crate::rrb::node::{Node, NodeRef};
use crate::rrb::types::{BranchTag, fresh_tag};
use crate::rrb::vector::RrbVector;

/// An exclusively owned, mutable vector under construction.
pub struct TransientVector<T> {
    root: NodeRef<T>,
    tag: BranchTag,
}

impl<T: Clone> TransientVector<T> {
    /// Opens an empty session.
    pub fn new() -> Self {
        let tag = fresh_tag();
        Self::from_parts(Arc::new(Node::empty(0, tag)), tag)
    }

    pub(crate) fn from_parts(root: NodeRef<T>, tag: BranchTag) -> Self {
        trace!(%tag, "opening transient session");
        TransientVector { root, tag }
    }

    /// The branch tag owning this session's nodes.
    pub fn tag(&self) -> BranchTag {
        self.tag
    }

    pub fn len(&self) -> usize {
        self.root.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn height(&self) -> usize {
        self.root.height
    }

    /// Appends `value` in place.
    pub fn push_back(&mut self, value: T) {
        Node::push(&mut self.root, self.tag, value);
    }

    pub fn get(&self, index: usize) -> Result<&T> {
        self.root.get(index).ok_or(SequenceError::OutOfRange {
            index,
            len: self.len(),
        })
    }

    /// Keeps only the first `index` elements.
    pub fn take(&mut self, index: usize) -> Result<()> {
        self.check_cut(index)?;
        Node::take(&mut self.root, self.tag, index);
        Ok(())
    }

    /// Removes the first `index` elements.
    pub fn drop(&mut self, index: usize) -> Result<()> {
        self.check_cut(index)?;
        Node::drop(&mut self.root, self.tag, index);
        Ok(())
    }

    /// Ends the session, publishing its nodes as immutable.
    pub fn persistent(self) -> RrbVector<T> {
        let TransientVector { mut root, tag } = self;
        Node::persist(&mut root, tag);
        trace!(%tag, size = root.size(), "committed transient session");
        RrbVector::from_root(root)
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

impl<T: Clone> Default for TransientVector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Extend<T> for TransientVector<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        Node::push_all(&mut self.root, self.tag, iter);
    }
}

impl<T> fmt::Debug for TransientVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransientVector")
            .field("tag", &self.tag)
            .field("len", &self.root.size())
            .field("height", &self.root.height)
            .finish()
    }
}
