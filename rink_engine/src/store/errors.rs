//! Store error types.

use std::time::Duration;
use thiserror::Error;

use crate::tournament::Revision;

/// Persistence failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// No tournament under that name
    #[error("Tournament not found: {0}")]
    NotFound(String),

    /// Create collided with an existing name
    #[error("Tournament already exists: {0}")]
    AlreadyExists(String),

    /// Compare-and-swap save lost against a newer write
    #[error("Stale write to '{name}': expected revision {expected}, stored {actual}")]
    Conflict {
        name: String,
        expected: Revision,
        actual: Revision,
    },

    /// Operation did not finish in time
    #[error("Store operation timed out after {0:?}")]
    Timeout(Duration),

    /// Backend unreachable or failed mid-request
    #[error("Store transport error: {0}")]
    Transport(String),

    /// Record could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Transient failures that a read may retry
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Timeout(_) | StoreError::Transport(_))
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
