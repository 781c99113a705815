//! Error types for sequence access.

use thiserror::Error;

/// A recoverable failure of a read or slice request.
///
/// Both variants carry the offending index and the length of the sequence at
/// the time of the call. Requests are never clamped to the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// `get`, `take` or `drop` past the current length.
    #[error("index {index} out of range for sequence of length {len}")]
    OutOfRange { index: usize, len: usize },
    /// A read or cursor starting beyond the end of the sequence.
    #[error("read position {index} is past the end of sequence of length {len}")]
    EndOfSequence { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, SequenceError>;
