//! Error types for filekit.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use thiserror::Error;

/// Main error type for filekit operations.
#[derive(Error, Debug)]
pub enum FilekitError {
    /// All lock acquisition attempts were exhausted without success.
    ///
    /// This is a hard failure of the requested operation. The lock component
    /// does not retry beyond its fixed budget; a caller may retry at a higher
    /// level if it chooses to.
    #[error("Lock acquisition timed out: {0}")]
    LockTimeout(String),

    /// Lock bookkeeping failed (artifact creation, metadata write, or release).
    #[error("Lock operation failed: {0}")]
    LockError(String),

    /// Filesystem access failed (open, read, write, copy, delete, ...).
    #[error("{0}")]
    ResourceError(String),

    /// JSON serialization or deserialization failed.
    #[error("Serialization failed: {0}")]
    SerializeError(String),
}

/// Result type alias for filekit operations.
pub type Result<T> = std::result::Result<T, FilekitError>;
