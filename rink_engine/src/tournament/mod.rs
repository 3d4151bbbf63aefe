//! Tournament records: roster, rounds, matches and rinks.
//!
//! A [`Tournament`] is the aggregate root handed out by the store. The engine
//! receives a copy, mutates it and hands the whole record back; identity of a
//! team is its exact name.
//!
//! ## Example
//!
//! ```
//! use chrono::Utc;
//! use rink_engine::tournament::{ScoringMode, Tournament};
//!
//! let tournament = Tournament::new(
//!     "Twilight Pairs",
//!     ["Smith", "Jones", "Brown", "Taylor"],
//!     ScoringMode::Skins,
//!     Utc::now(),
//! )
//! .expect("valid roster");
//!
//! assert_eq!(tournament.teams.len(), 4);
//! assert_eq!(tournament.next_round_number(), 1);
//! ```

pub mod errors;
pub mod models;
pub mod resource;

pub use errors::{ValidationError, ValidationResult};
pub use models::{
    MAX_SHOTS, MIN_TEAMS, Match, Revision, Round, SKINS_PER_MATCH, ScoreCard, ScoringMode, Side, Skin, Team,
    Tournament,
};
pub use resource::{DEFAULT_RINKS_PER_ZONE, DEFAULT_ZONES, Resource, ResourcePool};
