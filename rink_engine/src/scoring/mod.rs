//! Scoring model: turns one match's raw entries into a normalized outcome.
//!
//! Two mutually exclusive rules are supported:
//! - **Standard**: a single score per side; 2 points for a win, 1 each for a draw
//! - **Skins**: three skins per match, 1 point per skin won (0.5 each when
//!   level) plus a 2-point bonus for the side with more total shots (1 each
//!   when level). Match points are not capped.

pub mod outcome;
pub mod points;

pub use outcome::{
    MatchResult, Outcome, SKINS_BONUS_POINTS, SKINS_SPLIT_BONUS_POINTS, STANDARD_DRAW_POINTS,
    STANDARD_WIN_POINTS, SkinsBreakdown, score_match, skins_breakdown,
};
pub use points::Points;
