//! Branch tags and the allocator that hands them out.
//!
//! A branch tag brands every node created during one transient build session.
//! Tag zero marks a persistent node, which is never mutated in place.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Ownership token carried by every node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BranchTag(u64);

impl BranchTag {
    /// The tag of published, permanently immutable nodes.
    pub const PERSISTENT: BranchTag = BranchTag(0);

    /// Returns true for the reserved persistent tag.
    pub fn is_persistent(self) -> bool {
        self.0 == 0
    }

    /// Raw counter value (for debugging)
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BranchTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_persistent() {
            write!(f, "persistent")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// A thread-safe monotonic source of transient tags.
///
/// Tags are never reused, so two live sessions can never share one, and the
/// persistent tag is never issued.
pub struct TagAllocator {
    next: AtomicU64,
}

impl TagAllocator {
    /// Creates an allocator whose first tag is 1
    pub const fn new() -> Self {
        TagAllocator {
            next: AtomicU64::new(1),
        }
    }

    #[cfg(test)]
    const fn starting_at(next: u64) -> Self {
        TagAllocator {
            next: AtomicU64::new(next),
        }
    }

    /// Issues the next unused transient tag.
    ///
    /// # Panics
    ///
    /// Once the counter is exhausted; it never wraps back to reuse tags.
    pub fn allocate(&self) -> BranchTag {
        match self
            .next
            .fetch_update(AtomicOrdering::Relaxed, AtomicOrdering::Relaxed, |next| {
                next.checked_add(1)
            }) {
            Ok(value) => BranchTag(value),
            Err(_) => panic!("branch tag space exhausted"),
        }
    }

    /// Number of tags issued so far
    pub fn issued(&self) -> u64 {
        self.next.load(AtomicOrdering::Relaxed) - 1
    }
}

impl Default for TagAllocator {
    fn default() -> Self {
        Self::new()
    }
}

static SESSION_TAGS: TagAllocator = TagAllocator::new();

/// Allocates a tag from the process-wide allocator.
pub fn fresh_tag() -> BranchTag {
    SESSION_TAGS.allocate()
}
