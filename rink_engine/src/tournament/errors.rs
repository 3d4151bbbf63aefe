//! Validation error types.

use thiserror::Error;

use super::models::ScoringMode;

/// Caller-fixable input errors. Nothing is mutated when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Tournament name is blank
    #[error("Tournament name must not be empty")]
    EmptyName,

    /// Roster too small to run an event
    #[error("Not enough teams: need {needed}, have {current}")]
    TooFewTeams { needed: usize, current: usize },

    /// Two roster entries share a name
    #[error("Duplicate team name: {0}")]
    DuplicateTeam(String),

    /// Patch carries no edits and no verification change
    #[error("Patch contains no changes")]
    EmptyPatch,

    /// Patch field does not exist in the tournament's scoring mode
    #[error("Field {field} is not valid in {mode} scoring")]
    FieldModeMismatch { field: String, mode: ScoringMode },

    /// Shot count no real match can reach
    #[error("Shot count {value} for {field} is out of range (max {max})")]
    ShotsOutOfRange { field: String, value: u32, max: u32 },

    /// Skin index outside 0..3
    #[error("Skin index {0} out of range (expected 0-2)")]
    SkinIndexOutOfRange(usize),

    /// Green/rink label could not be parsed
    #[error("Invalid rink label: {0}")]
    InvalidResourceLabel(String),

    /// Round number could not be parsed or is zero
    #[error("Invalid round number: {0}")]
    InvalidRoundNumber(String),

    /// Resource pool has no greens or no rinks
    #[error("Resource pool is empty")]
    EmptyResourcePool,
}

/// Result type for validation
pub type ValidationResult<T> = Result<T, ValidationError>;
