//! Error types for the memory hierarchy.

use thiserror::Error;

/// Result type alias using [`MemError`].
pub type Result<T> = std::result::Result<T, MemError>;

/// Errors raised by the cache, the backing store and their front ends.
#[derive(Error, Debug)]
pub enum MemError {
    /// An access touched bytes outside the backing store.
    #[error("access of {len} bytes at {addr:#x} is outside memory of {size} bytes")]
    OutOfRange { addr: u64, len: usize, size: usize },

    /// An instruction string does not fit the fixed instruction buffer.
    #[error("instruction of {len} bytes does not fit a {max}-byte buffer")]
    InstructionTooLong { len: usize, max: usize },

    /// The requested geometry cannot be built.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A memory trace record could not be parsed.
    #[error("trace line {line}: {reason}")]
    Trace { line: usize, reason: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON configuration error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MemError {
    /// Returns true for bounds violations, which front ends surface differently.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, MemError::OutOfRange { .. })
    }
}
