//! Error types for Chronoshard.
//!
//! Every layer (codec, storage adapter, shard registry, write engine and
//! query dispatcher) reports failures through [`Error`]. Backend-specific
//! errors are flattened into strings at the storage boundary so that this
//! crate stays free of engine dependencies.

use std::path::PathBuf;
use thiserror::Error;

/// All Chronoshard errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying store could not be opened or created
    #[error("failed to open store at {}: {reason}", path.display())]
    Open {
        /// Path of the store file
        path: PathBuf,
        /// Engine-reported reason
        reason: String,
    },

    /// The shard has been closed; no handle may be opened and no write may succeed
    #[error("shard closed")]
    ShardClosed,

    /// A write transaction failed and was rolled back as a unit
    #[error("transaction aborted: {0}")]
    Transaction(String),

    /// The database handle was evicted but its backing storage could not be removed
    #[error("failed to remove storage for database {database}: {source}")]
    Drop {
        /// Database whose storage is orphaned
        database: String,
        /// Underlying deletion error
        #[source]
        source: std::io::Error,
    },

    /// Caller input violates a precondition (embedded NUL, bad database name, ...)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A value could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A stored key or value does not match the on-disk format
    #[error("corruption: {0}")]
    Corruption(String),

    /// Engine-level failure outside a write transaction
    #[error("storage error: {0}")]
    Storage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Chronoshard operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if retrying the same operation may succeed.
    ///
    /// Writes are idempotent, so an aborted batch can be replayed as a whole.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Transaction(_))
    }

    /// Check if this error was caused by a closed shard.
    pub fn is_closed(&self) -> bool {
        matches!(self, Error::ShardClosed)
    }

    /// Check if the caller supplied invalid input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}
