//! Field-level match patches with revision and verification checks.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::{PatchError, PatchResult};
use crate::tournament::{
    MAX_SHOTS, Match, Resource, Revision, Round, SKINS_PER_MATCH, ScoreCard, ScoringMode, Side, Team, Tournament,
    ValidationError, ValidationResult,
};

/// Who is sending the patch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actor {
    /// Tournament organizer: may enter scores and verify or unverify
    Organizer,
    /// Player device reached through a share link: may only enter scores
    Player,
}

/// Identifies one match within a round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchRef {
    /// Position in the round's match list
    Index(usize),
    /// Rink the match is played on
    Resource(Resource),
    /// The two teams, in either orientation
    Teams(Team, Team),
}

impl MatchRef {
    /// Position of the referenced match in `round`
    pub fn locate(&self, round: &Round) -> Option<usize> {
        match self {
            MatchRef::Index(index) => (*index < round.len()).then_some(*index),
            MatchRef::Resource(resource) => round.iter().position(|m| &m.resource == resource),
            MatchRef::Teams(x, y) => round.iter().position(|m| m.is_between(x, y)),
        }
    }
}

impl fmt::Display for MatchRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchRef::Index(index) => write!(f, "#{index}"),
            MatchRef::Resource(resource) => write!(f, "rink {resource}"),
            MatchRef::Teams(x, y) => write!(f, "{x} v {y}"),
        }
    }
}

/// One editable score slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreField {
    Score1,
    Score2,
    Skin { index: usize, side: Side },
}

impl ScoreField {
    /// Scoring mode this field belongs to
    pub fn mode(&self) -> ScoringMode {
        match self {
            ScoreField::Score1 | ScoreField::Score2 => ScoringMode::Standard,
            ScoreField::Skin { .. } => ScoringMode::Skins,
        }
    }
}

impl fmt::Display for ScoreField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreField::Score1 => write!(f, "score1"),
            ScoreField::Score2 => write!(f, "score2"),
            ScoreField::Skin { index, side: Side::A } => write!(f, "skins[{index}].a"),
            ScoreField::Skin { index, side: Side::B } => write!(f, "skins[{index}].b"),
        }
    }
}

/// New value for one field; `None` clears it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEdit {
    pub field: ScoreField,
    pub value: Option<u32>,
}

/// Changes a caller wants made to one match.
///
/// Only the listed fields are touched, so two callers editing different
/// fields never overwrite each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPatch {
    #[serde(default)]
    pub edits: Vec<FieldEdit>,
    /// `Some(true)` verifies, `Some(false)` unverifies
    #[serde(default)]
    pub verified: Option<bool>,
}

impl MatchPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any earlier edit of the same field
    pub fn set(self, field: ScoreField, value: u32) -> Self {
        self.with_edit(FieldEdit {
            field,
            value: Some(value),
        })
    }

    /// Clear a field
    pub fn clear(self, field: ScoreField) -> Self {
        self.with_edit(FieldEdit { field, value: None })
    }

    pub fn verify(mut self) -> Self {
        self.verified = Some(true);
        self
    }

    pub fn unverify(mut self) -> Self {
        self.verified = Some(false);
        self
    }

    fn with_edit(mut self, edit: FieldEdit) -> Self {
        match self.edits.iter_mut().find(|e| e.field == edit.field) {
            Some(existing) => *existing = edit,
            None => self.edits.push(edit),
        }
        self
    }

    /// Whether the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty() && self.verified.is_none()
    }

    /// Whether the patch touches any score field
    pub fn edits_scores(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Coalesce a later patch for the same match into this one.
    ///
    /// Per field the later value wins; a later verification change wins.
    /// Lets a client batch rapid keystrokes into a single patch.
    pub fn merge(self, later: MatchPatch) -> MatchPatch {
        let verified = later.verified.or(self.verified);
        let mut merged = later.edits.into_iter().fold(self, MatchPatch::with_edit);
        merged.verified = verified;
        merged
    }

    /// Check the patch against the tournament's scoring mode
    pub fn validate(&self, mode: ScoringMode) -> ValidationResult<()> {
        if self.is_empty() {
            return Err(ValidationError::EmptyPatch);
        }

        for edit in &self.edits {
            if edit.field.mode() != mode {
                return Err(ValidationError::FieldModeMismatch {
                    field: edit.field.to_string(),
                    mode,
                });
            }
            if let ScoreField::Skin { index, .. } = edit.field {
                if index >= SKINS_PER_MATCH {
                    return Err(ValidationError::SkinIndexOutOfRange(index));
                }
            }
            if let Some(value) = edit.value.filter(|v| *v > MAX_SHOTS) {
                return Err(ValidationError::ShotsOutOfRange {
                    field: edit.field.to_string(),
                    value,
                    max: MAX_SHOTS,
                });
            }
        }

        Ok(())
    }
}

/// Apply a patch to one match and return the updated record.
///
/// All checks run before anything changes, so a refused patch leaves no
/// trace. On success the returned record carries `expected_revision + 1`.
///
/// # Errors
///
/// * `PatchError::Conflict` - `expected_revision` is stale
/// * `PatchError::Validation` - empty patch, wrong-mode field, bad skin index
///   or a shot count above [`MAX_SHOTS`]
/// * `PatchError::Forbidden` - a player tried to verify or unverify
/// * `PatchError::RoundNotFound` / `PatchError::MatchNotFound` - bad address
/// * `PatchError::MatchLocked` - score edit on a verified match
pub fn apply_match_patch(
    tournament: &Tournament,
    round_index: usize,
    match_ref: &MatchRef,
    patch: &MatchPatch,
    expected_revision: Revision,
    actor: Actor,
) -> PatchResult<Tournament> {
    if tournament.revision != expected_revision {
        warn!(
            "Rejected patch on '{}': revision {} is stale (current {})",
            tournament.name, expected_revision, tournament.revision
        );
        return Err(PatchError::Conflict {
            expected: expected_revision,
            actual: tournament.revision,
        });
    }

    patch.validate(tournament.scoring_mode)?;

    if patch.verified.is_some() && actor != Actor::Organizer {
        return Err(PatchError::Forbidden("only the organizer can change verification"));
    }

    let round = tournament
        .round(round_index)
        .ok_or(PatchError::RoundNotFound(round_index))?;
    let index = match_ref.locate(round).ok_or_else(|| PatchError::MatchNotFound {
        round: round_index,
        reference: match_ref.to_string(),
    })?;

    let current = &round.matches[index];
    if current.verified && patch.edits_scores() {
        warn!(
            "Rejected score edit on verified match {} ({} v {}) in '{}'",
            current.resource, current.team1, current.team2, tournament.name
        );
        return Err(PatchError::MatchLocked {
            round: round_index,
            index,
        });
    }
    if current.scores.mode() != tournament.scoring_mode {
        return Err(ValidationError::FieldModeMismatch {
            field: "scores".to_string(),
            mode: tournament.scoring_mode,
        }
        .into());
    }

    let mut updated = tournament.clone();
    let target = &mut updated.rounds[round_index].matches[index];
    for edit in &patch.edits {
        apply_edit(target, edit);
    }
    if let Some(verified) = patch.verified {
        target.verified = verified;
    }

    let revision = updated.bump_revision();
    info!(
        "Patched match {} in round {} of '{}' ({} field(s), revision {})",
        match_ref,
        round_index + 1,
        updated.name,
        patch.edits.len(),
        revision
    );
    Ok(updated)
}

fn apply_edit(target: &mut Match, edit: &FieldEdit) {
    match (&mut target.scores, edit.field) {
        (ScoreCard::Standard { score1, .. }, ScoreField::Score1) => *score1 = edit.value,
        (ScoreCard::Standard { score2, .. }, ScoreField::Score2) => *score2 = edit.value,
        (ScoreCard::Skins { skins }, ScoreField::Skin { index, side }) => {
            if let Some(skin) = skins.get_mut(index) {
                skin.set(side, edit.value);
            }
        }
        // Shape is validated before any edit is applied
        _ => {}
    }
}
