//! Type definitions shared by the tree engines.

pub mod branch;

pub use branch::{BranchTag, TagAllocator, fresh_tag};
