//! Pairing error types.

use thiserror::Error;

/// Round generation failures. No round is appended when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairingError {
    /// Roster too small to form a single match
    #[error("Not enough teams to pair: need {needed}, have {current}")]
    InsufficientTeams { needed: usize, current: usize },

    /// More matches than rinks in the pool
    #[error("Not enough rinks: round needs {needed}, pool has {available}")]
    InsufficientResources { needed: usize, available: usize },
}

/// Result type for pairing operations
pub type PairingResult<T> = Result<T, PairingError>;
