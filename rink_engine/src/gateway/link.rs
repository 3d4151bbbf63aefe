//! Share links handed to players for entering scores from a rink.

use serde::{Deserialize, Serialize};

use super::errors::{PatchError, PatchResult};
use super::patch::MatchRef;
use crate::tournament::{Resource, Tournament, ValidationError, ValidationResult};

/// Tournament, round and rink addressed by a player score link.
///
/// `round` is 1-based as shown to players; `None` means the latest round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLink {
    pub tournament: String,
    pub round: Option<usize>,
    pub resource: Resource,
}

impl ScoreLink {
    /// Build a link from raw query values.
    ///
    /// # Arguments
    ///
    /// * `tournament` - Tournament name
    /// * `round` - 1-based round number as text, or `None` for the latest round
    /// * `rink` - Rink label such as `"A3"` or `"b-12"`
    ///
    /// # Errors
    ///
    /// * `ValidationError::InvalidRoundNumber` - round is not a positive integer
    /// * `ValidationError::InvalidResourceLabel` - rink label does not parse
    pub fn parse(tournament: &str, round: Option<&str>, rink: &str) -> ValidationResult<Self> {
        let round = match round.map(str::trim).filter(|r| !r.is_empty()) {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => Some(n),
                _ => return Err(ValidationError::InvalidRoundNumber(raw.to_string())),
            },
            None => None,
        };

        Ok(Self {
            tournament: tournament.to_string(),
            round,
            resource: rink.parse()?,
        })
    }

    /// 0-based round index this link points at
    ///
    /// # Errors
    ///
    /// * `PatchError::RoundNotFound` - the round does not exist yet, is
    ///   numbered 0, or the tournament has no rounds at all
    pub fn round_index(&self, tournament: &Tournament) -> PatchResult<usize> {
        let index = match self.round {
            Some(number) => number.checked_sub(1).ok_or(PatchError::RoundNotFound(0))?,
            None => tournament.latest_round_index().ok_or(PatchError::RoundNotFound(0))?,
        };

        if tournament.round(index).is_none() {
            return Err(PatchError::RoundNotFound(index));
        }
        Ok(index)
    }

    pub fn match_ref(&self) -> MatchRef {
        MatchRef::Resource(self.resource)
    }
}
