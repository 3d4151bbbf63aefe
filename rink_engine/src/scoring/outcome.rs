//! Per-match outcome calculation for both scoring modes.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::points::Points;
use crate::tournament::{Match, ScoreCard, ScoringMode, Skin};

/// Points for a standard-mode win
pub const STANDARD_WIN_POINTS: Points = Points::whole(2);

/// Points each side receives for a standard-mode draw
pub const STANDARD_DRAW_POINTS: Points = Points::whole(1);

/// Bonus for the side with more total shots across all skins
pub const SKINS_BONUS_POINTS: Points = Points::whole(2);

/// Bonus each side receives when total shots are level
pub const SKINS_SPLIT_BONUS_POINTS: Points = Points::whole(1);

/// Result of a completed match from team1's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    Team1Won,
    Team2Won,
    Draw,
}

/// Skins scoring detail: shots, skin points, bonus and match points per side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkinsBreakdown {
    pub total_a: u32,
    pub total_b: u32,
    pub skin_points_a: Points,
    pub skin_points_b: Points,
    pub bonus_a: Points,
    pub bonus_b: Points,
    pub match_points_a: Points,
    pub match_points_b: Points,
}

/// Normalized contribution of one match to the standings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub shots_for1: u32,
    pub shots_for2: u32,
    pub points1: Points,
    pub points2: Points,
    pub complete: bool,
    /// Present for completed skins matches
    pub skins: Option<SkinsBreakdown>,
}

impl Outcome {
    /// Zero contribution, used for unfinished or malformed matches
    pub fn incomplete() -> Self {
        Self::default()
    }

    /// Win/draw/loss by comparing points, `None` while incomplete.
    ///
    /// In skins mode the comparison uses each side's uncapped match points.
    pub fn result(&self) -> Option<MatchResult> {
        if !self.complete {
            return None;
        }
        Some(match self.points1.cmp(&self.points2) {
            Ordering::Greater => MatchResult::Team1Won,
            Ordering::Less => MatchResult::Team2Won,
            Ordering::Equal => MatchResult::Draw,
        })
    }
}

/// Score one match under the tournament's scoring mode.
///
/// Never fails: a match with a blank team, missing scores, or a card whose
/// shape does not match `mode` yields [`Outcome::incomplete`].
///
/// # Example
///
/// ```
/// use rink_engine::scoring::{score_match, Points};
/// use rink_engine::tournament::{Match, Resource, ScoreCard, ScoringMode};
///
/// let mut m = Match::new("Smith".into(), "Jones".into(), Resource::new('A', 1), ScoringMode::Standard);
/// m.scores = ScoreCard::Standard { score1: Some(7), score2: Some(5) };
///
/// let outcome = score_match(&m, ScoringMode::Standard);
/// assert!(outcome.complete);
/// assert_eq!(outcome.points1, Points::whole(2));
/// assert_eq!(outcome.points2, Points::ZERO);
/// ```
pub fn score_match(m: &Match, mode: ScoringMode) -> Outcome {
    if !m.is_well_formed() {
        return Outcome::incomplete();
    }

    match (mode, &m.scores) {
        (
            ScoringMode::Standard,
            ScoreCard::Standard {
                score1: Some(s1),
                score2: Some(s2),
            },
        ) => score_standard(*s1, *s2),
        (ScoringMode::Skins, ScoreCard::Skins { skins }) if skins.iter().all(Skin::is_complete) => {
            let breakdown = skins_breakdown(skins);
            Outcome {
                shots_for1: breakdown.total_a,
                shots_for2: breakdown.total_b,
                points1: breakdown.match_points_a,
                points2: breakdown.match_points_b,
                complete: true,
                skins: Some(breakdown),
            }
        }
        _ => Outcome::incomplete(),
    }
}

fn score_standard(s1: u32, s2: u32) -> Outcome {
    let (points1, points2) = match s1.cmp(&s2) {
        Ordering::Greater => (STANDARD_WIN_POINTS, Points::ZERO),
        Ordering::Less => (Points::ZERO, STANDARD_WIN_POINTS),
        Ordering::Equal => (STANDARD_DRAW_POINTS, STANDARD_DRAW_POINTS),
    };

    Outcome {
        shots_for1: s1,
        shots_for2: s2,
        points1,
        points2,
        complete: true,
        skins: None,
    }
}

/// Skins totals over whatever has been entered so far.
///
/// Shots count for every entered value; a skin point is only decided once
/// both sides of that skin are in. The bonus compares total shots, not
/// skin points. Totals saturate, so a corrupt stored record cannot panic.
pub fn skins_breakdown(skins: &[Skin]) -> SkinsBreakdown {
    let mut b = SkinsBreakdown::default();

    for skin in skins {
        b.total_a = b.total_a.saturating_add(skin.a.unwrap_or(0));
        b.total_b = b.total_b.saturating_add(skin.b.unwrap_or(0));

        if let (Some(a), Some(bs)) = (skin.a, skin.b) {
            match a.cmp(&bs) {
                Ordering::Greater => b.skin_points_a += Points::whole(1),
                Ordering::Less => b.skin_points_b += Points::whole(1),
                Ordering::Equal => {
                    b.skin_points_a += Points::HALF;
                    b.skin_points_b += Points::HALF;
                }
            }
        }
    }

    (b.bonus_a, b.bonus_b) = match b.total_a.cmp(&b.total_b) {
        Ordering::Greater => (SKINS_BONUS_POINTS, Points::ZERO),
        Ordering::Less => (Points::ZERO, SKINS_BONUS_POINTS),
        Ordering::Equal => (SKINS_SPLIT_BONUS_POINTS, SKINS_SPLIT_BONUS_POINTS),
    };

    b.match_points_a = b.skin_points_a + b.bonus_a;
    b.match_points_b = b.skin_points_b + b.bonus_b;
    b
}

impl Match {
    /// Running skins totals for display, `None` for standard cards
    pub fn skins_totals(&self) -> Option<SkinsBreakdown> {
        match &self.scores {
            ScoreCard::Skins { skins } => Some(skins_breakdown(skins)),
            ScoreCard::Standard { .. } => None,
        }
    }
}
