//! Error kinds shared across the engine.

use thiserror::Error;

/// Convenience alias for fallible engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors raised by the storage engine.
///
/// Every variant reports a caller-contract violation detected before any
/// mutation takes place; none is transient, so retrying never helps. A miss
/// on `get`/`delete` is a normal outcome (`None`), never an error.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// The tree was constructed with too little fan-out to ever split.
    #[error("order of a B+ tree must be at least 4, got {order}")]
    InvalidOrder {
        /// The rejected order.
        order: usize,
    },
    /// An interval was constructed with `left >= right`.
    #[error("left endpoint of an interval must be less than the right endpoint")]
    InvalidInterval,
    /// The key lies beyond the right boundary of the index range and must be
    /// routed to the external write buffer instead.
    #[error("key lies to the right of the index range and belongs in the write buffer")]
    OutOfRange,
    /// A table split was requested with too few entries to partition.
    #[error("a table must hold at least 3 entries to split, got {size}")]
    InsufficientSize {
        /// Number of entries the table actually held.
        size: usize,
    },
}
