//! # RRB Buffer - Relaxed Radix-Balanced Sequence
//!
//! A persistent, structurally shared sequence meant to back an editable
//! buffer such as a text editor's content. Every version stays valid after
//! an edit and shares all untouched nodes with its successors.
//!
//! ## Features
//!
//! - **Persistent**: `push_back`, `take`, `drop` and `concat` return new vectors
//! - **Efficient**: O(log n) indexing, slicing and concatenation, amortized
//!   O(1) append
//! - **Transient sessions**: bulk builds mutate their own nodes in place
//! - **Thread-safe reads**: published vectors are immutable and `Send + Sync`
//!
//! ## Example
//!
//! ```rust
//! use rrb_buffer::RrbVector;
//!
//! let text: RrbVector<u8> = b"hello world".iter().copied().collect();
//! let (hello, world) = text.split_at(5).unwrap();
//! let edited = hello.concat(&RrbVector::from_slice(b",")).concat(&world);
//! assert_eq!(edited.to_vec(), b"hello, world");
//! assert_eq!(text.len(), 11);
//! ```

pub mod error;
pub mod rrb;

// Re-export the main public API from the tree module
pub use error::{Result, SequenceError};
pub use rrb::{BITS, BRANCHING, BranchTag, Cursor, Iter, RrbVector, TransientVector};
