//! Match patch error types.

use thiserror::Error;

use crate::tournament::{Revision, ValidationError};

/// Reasons a match patch is refused. A refused patch changes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    /// Malformed patch payload
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The record changed since the caller read it
    #[error("Revision conflict: expected {expected}, current {actual}")]
    Conflict { expected: Revision, actual: Revision },

    /// Round index past the end of the round list
    #[error("Round not found: {0}")]
    RoundNotFound(usize),

    /// No match in the round answers to the reference
    #[error("Match not found in round {round}: {reference}")]
    MatchNotFound { round: usize, reference: String },

    /// Scores are locked by verification
    #[error("Match {index} in round {round} is verified; unverify it before editing scores")]
    MatchLocked { round: usize, index: usize },

    /// Caller lacks the role for this change
    #[error("Forbidden: {0}")]
    Forbidden(&'static str),
}

/// Result type for patch operations
pub type PatchResult<T> = Result<T, PatchError>;
