//! Access engine: maps a linear index to its leaf and offset.

use crate::rrb::node::{Node, Slots};

impl<T> Node<T> {
    /// Descends to the leaf holding element `index`. Returns the leaf's
    /// elements and the offset of `index` within them, or `None` when
    /// `index` is past the end.
    pub(crate) fn leaf_at(&self, index: usize) -> Option<(&[T], usize)> {
        if index >= self.size() {
            return None;
        }
        let mut node = self;
        let mut index = index;
        loop {
            match &node.slots {
                Slots::Leaf(elements) => return Some((elements.as_slice(), index)),
                Slots::Internal { children, .. } => {
                    let (slot, local) = node.locate(index);
                    node = &children[slot];
                    index = local;
                }
            }
        }
    }

    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        let (elements, offset) = self.leaf_at(index)?;
        elements.get(offset)
    }

    /// The rest of the leaf holding `index`, and whether more elements follow
    /// that leaf. At `index == size` the slice is empty.
    pub(crate) fn read_from(&self, index: usize) -> Option<(&[T], bool)> {
        let size = self.size();
        if index > size {
            return None;
        }
        match self.leaf_at(index) {
            Some((elements, offset)) => {
                let chunk = &elements[offset..];
                Some((chunk, index + chunk.len() < size))
            }
            None => Some((Default::default(), false)),
        }
    }
}

impl<T: Clone> Node<T> {
    /// Copies elements starting at `index` into `buf`, one leaf at a time.
    /// Returns the number of elements copied.
    pub(crate) fn read_into(&self, index: usize, buf: &mut [T]) -> Option<usize> {
        let mut copied = 0;
        let mut position = index;
        while copied < buf.len() {
            let (chunk, has_more) = self.read_from(position)?;
            let count = chunk.len().min(buf.len() - copied);
            buf[copied..copied + count].clone_from_slice(&chunk[..count]);
            copied += count;
            position += count;
            if !has_more {
                break;
            }
        }
        Some(copied)
    }
}
