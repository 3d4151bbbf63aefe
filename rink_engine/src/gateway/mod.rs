//! Concurrent update gateway for match scores.
//!
//! Organizer and player devices edit the same tournament at once. Each edit is
//! a field-level [`MatchPatch`] carrying the revision the caller last read, so
//! edits to different fields compose and a stale write is refused rather than
//! silently overwriting a newer record. A verified match rejects score edits
//! until the organizer unverifies it.
//!
//! ## Example
//!
//! ```
//! use chrono::Utc;
//! use rink_engine::gateway::{Actor, MatchPatch, MatchRef, ScoreField, apply_match_patch};
//! use rink_engine::pairing::generate_round;
//! use rink_engine::tournament::{ScoringMode, Tournament};
//!
//! let mut tournament = Tournament::new("Club Night", ["A", "B"], ScoringMode::Standard, Utc::now())
//!     .expect("valid roster");
//! let round = generate_round(&tournament).expect("two teams pair");
//! tournament.push_round(round);
//!
//! let patch = MatchPatch::new().set(ScoreField::Score1, 12).set(ScoreField::Score2, 9);
//! let updated = apply_match_patch(&tournament, 0, &MatchRef::Index(0), &patch, tournament.revision, Actor::Player)
//!     .expect("fresh revision");
//! assert_eq!(updated.revision, tournament.revision + 1);
//! ```

pub mod errors;
pub mod link;
pub mod patch;

pub use errors::{PatchError, PatchResult};
pub use link::ScoreLink;
pub use patch::{Actor, FieldEdit, MatchPatch, MatchRef, ScoreField, apply_match_patch};
