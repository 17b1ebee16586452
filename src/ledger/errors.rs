//! Host ledger errors.

use thiserror::Error;

/// Result type for host ledger calls
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Failures reported by the host ledger
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// State keys must be non-empty
    #[error("key must not be an empty string")]
    EmptyKey,

    /// A composite key part contains a reserved code point
    #[error("invalid composite key part {0:?}: contains a reserved code point")]
    InvalidCompositeKeyPart(String),

    /// A key handed to `split_composite_key` was not built by `create_composite_key`
    #[error("not a composite key: {0:?}")]
    NotCompositeKey(String),

    /// The predicate query could not be parsed or uses unsupported operators
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Storage-level failure (I/O, size limits, access control)
    #[error("ledger I/O failure: {0}")]
    Io(String),

    /// Cursor was used after close
    #[error("cursor already closed")]
    CursorClosed,

    /// `next_entry` was called on an exhausted cursor
    #[error("no more entries in cursor")]
    CursorExhausted,
}
