//! # Rink Engine
//!
//! Pairing and standings engine for social lawn-bowls tournaments.
//!
//! A tournament is a roster of teams playing a sequence of rounds. Each round
//! pairs teams onto rinks, avoiding repeat opponents and spreading every
//! team's rink usage; results are entered per match, verified by the
//! organizer, and folded into a ranked standings table.
//!
//! ## Scoring Modes
//!
//! - **Standard**: one score per side; win 2, draw 1, loss 0
//! - **Skins**: three skins per match, a point per skin won plus a 2-point
//!   bonus for more total shots
//!
//! ## Core Modules
//!
//! - [`tournament`]: Records: teams, rinks, matches, rounds
//! - [`scoring`]: Per-match outcomes and points
//! - [`standings`]: Ranked standings table
//! - [`pairing`]: Next-round generation
//! - [`gateway`]: Field-level match patches under concurrent editing
//! - [`store`]: Persistence contract, in-memory store, read retries
//! - [`service`]: Async facade over a store
//! - [`summary`]: Dashboard progress
//!
//! ## Example
//!
//! ```
//! use chrono::Utc;
//! use rink_engine::{StandingsOptions, ScoringMode, Tournament, generate_round, standings_for};
//!
//! let mut tournament = Tournament::new("Club Night", ["A", "B", "C", "D"], ScoringMode::Standard, Utc::now())
//!     .expect("valid roster");
//! let round = generate_round(&tournament).expect("four teams pair");
//! tournament.push_round(round);
//!
//! let table = standings_for(&tournament, StandingsOptions::default());
//! assert_eq!(table.len(), 4);
//! ```

/// Tournament records and validation.
pub mod tournament;
pub use tournament::{
    Match, Resource, ResourcePool, Revision, Round, ScoreCard, ScoringMode, Side, Skin, Team, Tournament,
    ValidationError, ValidationResult,
};

/// Match scoring.
pub mod scoring;
pub use scoring::{MatchResult, Outcome, Points, SkinsBreakdown, score_match};

/// Standings table.
pub mod standings;
pub use standings::{StandingRow, StandingsOptions, compute_standings, standings_for};

/// Round generation.
pub mod pairing;
pub use pairing::{PairingConfig, PairingError, PairingGenerator, extract_history, generate_round};

/// Concurrent match updates.
pub mod gateway;
pub use gateway::{Actor, MatchPatch, MatchRef, PatchError, ScoreField, ScoreLink, apply_match_patch};

/// Persistence.
pub mod store;
pub use store::{InMemoryTournamentStore, RetryPolicy, StoreError, TournamentStore};

/// Service facade.
pub mod service;
pub use service::{EngineConfig, EngineError, TournamentService};

/// Progress summary.
pub mod summary;
pub use summary::{TournamentSummary, summarize};
