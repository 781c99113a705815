//! Relaxed radix-balanced tree implementation module.
//!
//! This module contains the tree node, the engines operating on it (append,
//! access, slicing, rebalance planning and concatenation), and the public
//! persistent and transient vector types built on top of them.

mod access;
mod append;
mod concat;
pub mod cursor;
pub mod node;
pub mod plan;
mod slice;
pub mod transient;
pub mod types;
pub mod vector;

// Re-export the main public API
pub use cursor::{Cursor, Iter};
pub use node::{BITS, BRANCHING};
pub use plan::{PLAN_LEN, Plan, plan};
pub use transient::TransientVector;
pub use types::{BranchTag, TagAllocator};
pub use vector::RrbVector;
