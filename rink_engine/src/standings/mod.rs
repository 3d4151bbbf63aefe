//! Standings aggregator: folds all counted matches into a ranked table.
//!
//! The ranking order (points, shot difference, shots for, name) is total and
//! is also the seeding order used by the pairing generator after round one.

pub mod table;

pub use table::{StandingRow, StandingsOptions, compare_rows, compute_standings, standings_for};
