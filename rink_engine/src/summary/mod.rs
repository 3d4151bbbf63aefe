//! Tournament progress summary for dashboards.

pub mod report;

pub use report::{MatchLocation, TournamentSummary, summarize};
