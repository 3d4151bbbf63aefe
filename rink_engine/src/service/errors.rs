//! Service error types.

use thiserror::Error;

use crate::gateway::PatchError;
use crate::pairing::PairingError;
use crate::store::StoreError;
use crate::tournament::ValidationError;

/// Any failure surfaced by [`TournamentService`](super::TournamentService)
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Pairing(#[from] PairingError),

    #[error(transparent)]
    Patch(#[from] PatchError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Whether the caller should reload the tournament and try again.
    ///
    /// True for revision conflicts (from the gateway or the store) and for
    /// transient store failures.
    pub fn is_retryable(&self) -> bool {
        match self {
            EngineError::Patch(PatchError::Conflict { .. }) => true,
            EngineError::Store(StoreError::Conflict { .. }) => true,
            EngineError::Store(e) => e.is_transient(),
            _ => false,
        }
    }

    /// Get a client-safe error message
    ///
    /// Storage internals (paths, I/O and decoding details) are not exposed.
    pub fn client_message(&self) -> String {
        match self {
            EngineError::Store(StoreError::Io(_) | StoreError::Serialization(_) | StoreError::Transport(_)) => {
                "Storage unavailable".to_string()
            }
            EngineError::Store(StoreError::Timeout(_)) => "Storage timed out, please retry".to_string(),
            EngineError::Patch(PatchError::Conflict { .. }) | EngineError::Store(StoreError::Conflict { .. }) => {
                "Tournament changed since it was loaded; reload and try again".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Result type for service operations
pub type EngineResult<T> = Result<T, EngineError>;
