//! Progress report for the tournament dashboard.

use serde::{Deserialize, Serialize};

use crate::scoring::{Points, score_match};
use crate::tournament::{Resource, Team, Tournament};

/// One match as shown in the pending and completed lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchLocation {
    /// 1-based round number
    pub round: usize,
    pub resource: Resource,
    pub team1: Team,
    pub team2: Team,
    pub verified: bool,
    /// Match points, present once the scores are complete
    pub points: Option<(Points, Points)>,
}

/// Counts and match lists across every round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentSummary {
    pub name: String,
    pub teams: usize,
    pub rounds: usize,
    pub total_matches: usize,
    /// Matches with every score entered
    pub completed_matches: usize,
    pub verified_matches: usize,
    /// Completed share of all matches, rounded to a whole percent
    pub progress_percent: u32,
    pub pending: Vec<MatchLocation>,
    pub completed: Vec<MatchLocation>,
}

/// Summarize scoring progress.
///
/// A match is completed once all its scores are entered, verified or not.
/// Malformed matches count toward the total but never as completed.
pub fn summarize(tournament: &Tournament) -> TournamentSummary {
    let mut pending = Vec::new();
    let mut completed = Vec::new();
    let mut verified_matches = 0;

    for (index, round) in tournament.rounds.iter().enumerate() {
        for m in round {
            let outcome = score_match(m, tournament.scoring_mode);
            if m.verified {
                verified_matches += 1;
            }

            let location = MatchLocation {
                round: index + 1,
                resource: m.resource,
                team1: m.team1.clone(),
                team2: m.team2.clone(),
                verified: m.verified,
                points: outcome.complete.then_some((outcome.points1, outcome.points2)),
            };

            if outcome.complete {
                completed.push(location);
            } else {
                pending.push(location);
            }
        }
    }

    let total_matches = pending.len() + completed.len();
    let progress_percent = match total_matches {
        0 => 0,
        total => ((completed.len() * 100 + total / 2) / total) as u32,
    };

    TournamentSummary {
        name: tournament.name.clone(),
        teams: tournament.teams.len(),
        rounds: tournament.rounds.len(),
        total_matches,
        completed_matches: completed.len(),
        verified_matches,
        progress_percent,
        pending,
        completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::{Match, Round, ScoreCard, ScoringMode, Skin};
    use chrono::Utc;

    fn standard(team1: &str, team2: &str, rink: u32, scores: Option<(u32, u32)>, verified: bool) -> Match {
        let mut m = Match::new(team1.into(), team2.into(), Resource::new('A', rink), ScoringMode::Standard);
        if let Some((s1, s2)) = scores {
            m.scores = ScoreCard::Standard {
                score1: Some(s1),
                score2: Some(s2),
            };
        }
        m.verified = verified;
        m
    }

    #[test]
    fn test_empty_tournament() {
        let t = Tournament::new("Empty", ["A", "B"], ScoringMode::Standard, Utc::now()).expect("valid");
        let summary = summarize(&t);
        assert_eq!(summary.total_matches, 0);
        assert_eq!(summary.progress_percent, 0);
        assert_eq!(summary.teams, 2);
    }

    #[test]
    fn test_progress_counts() {
        let mut t = Tournament::new("Progress", ["A", "B", "C", "D"], ScoringMode::Standard, Utc::now())
            .expect("valid");
        t.push_round(Round::new(vec![
            standard("A", "B", 1, Some((10, 4)), true),
            standard("C", "D", 2, Some((6, 6)), false),
        ]));
        t.push_round(Round::new(vec![
            standard("A", "C", 1, None, false),
            standard("B", "D", 2, None, false),
        ]));

        let summary = summarize(&t);
        assert_eq!(summary.rounds, 2);
        assert_eq!(summary.total_matches, 4);
        assert_eq!(summary.completed_matches, 2);
        assert_eq!(summary.verified_matches, 1);
        assert_eq!(summary.progress_percent, 50);

        assert_eq!(summary.completed[0].points, Some((Points::whole(2), Points::ZERO)));
        assert_eq!(summary.completed[1].points, Some((Points::whole(1), Points::whole(1))));
        assert!(summary.pending.iter().all(|p| p.round == 2 && p.points.is_none()));
    }

    #[test]
    fn test_progress_rounds_to_nearest() {
        let mut t = Tournament::new("Thirds", ["A", "B", "C", "D", "E", "F"], ScoringMode::Standard, Utc::now())
            .expect("valid");
        t.push_round(Round::new(vec![
            standard("A", "B", 1, Some((3, 1)), false),
            standard("C", "D", 2, Some((3, 1)), false),
            standard("E", "F", 3, None, false),
        ]));
        assert_eq!(summarize(&t).progress_percent, 67);
    }

    #[test]
    fn test_partial_skins_are_pending() {
        let mut t = Tournament::new("Skins", ["A", "B"], ScoringMode::Skins, Utc::now()).expect("valid");
        let mut m = Match::new("A".into(), "B".into(), Resource::new('B', 1), ScoringMode::Skins);
        m.scores = ScoreCard::Skins {
            skins: [Skin::new(3, 2), Skin::new(1, 4), Skin::default()],
        };
        t.push_round(Round::new(vec![m]));

        let summary = summarize(&t);
        assert_eq!(summary.completed_matches, 0);
        assert_eq!(summary.pending.len(), 1);
        assert_eq!(summary.pending[0].resource, Resource::new('B', 1));
    }
}
