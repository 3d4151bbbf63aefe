//! Standings aggregation and the total ranking order.

use log::debug;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::BTreeMap};

use crate::scoring::{MatchResult, Points, score_match};
use crate::tournament::{Round, ScoringMode, Team, Tournament};

/// One team's line in the standings table. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
    pub team: Team,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub shots_for: u32,
    pub shots_against: u32,
    /// Always `shots_for - shots_against`
    pub diff: i64,
    pub points: Points,
}

impl StandingRow {
    pub fn new(team: Team) -> Self {
        Self {
            team,
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            shots_for: 0,
            shots_against: 0,
            diff: 0,
            points: Points::ZERO,
        }
    }

    fn record(&mut self, shots_for: u32, shots_against: u32, points: Points, result: Ordering) {
        self.played += 1;
        match result {
            Ordering::Greater => self.won += 1,
            Ordering::Equal => self.drawn += 1,
            Ordering::Less => self.lost += 1,
        }
        self.shots_for = self.shots_for.saturating_add(shots_for);
        self.shots_against = self.shots_against.saturating_add(shots_against);
        self.points += points;
        self.diff = i64::from(self.shots_for) - i64::from(self.shots_against);
    }
}

/// Which matches count towards the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsOptions {
    /// Only organizer-verified matches count
    pub require_verified: bool,
}

impl StandingsOptions {
    /// Count every complete match, verified or not (provisional table)
    pub fn provisional() -> Self {
        Self {
            require_verified: false,
        }
    }
}

impl Default for StandingsOptions {
    fn default() -> Self {
        Self {
            require_verified: true,
        }
    }
}

/// Ranking order: points desc, diff desc, shots-for desc, name asc.
///
/// The name comparison is a plain ordinal string compare, so the order is
/// total and independent of locale.
pub fn compare_rows(a: &StandingRow, b: &StandingRow) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.diff.cmp(&a.diff))
        .then_with(|| b.shots_for.cmp(&a.shots_for))
        .then_with(|| a.team.cmp(&b.team))
}

/// Fold every counted match of every round into a ranked table.
///
/// Rows exist for each team seen in any match, including teams no longer
/// on the roster. Incomplete matches (and, with `require_verified`,
/// unverified ones) add nothing, not even partial shots.
pub fn compute_standings(
    rounds: &[Round],
    mode: ScoringMode,
    options: StandingsOptions,
) -> Vec<StandingRow> {
    let mut table: BTreeMap<Team, StandingRow> = BTreeMap::new();
    let mut counted = 0usize;

    for round in rounds {
        for m in round {
            if !m.is_well_formed() {
                continue;
            }

            for team in [&m.team1, &m.team2] {
                table
                    .entry(team.clone())
                    .or_insert_with(|| StandingRow::new(team.clone()));
            }

            if options.require_verified && !m.verified {
                continue;
            }

            let outcome = score_match(m, mode);
            let Some(result) = outcome.result() else {
                continue;
            };
            let side1 = match result {
                MatchResult::Team1Won => Ordering::Greater,
                MatchResult::Team2Won => Ordering::Less,
                MatchResult::Draw => Ordering::Equal,
            };

            if let Some(row) = table.get_mut(&m.team1) {
                row.record(outcome.shots_for1, outcome.shots_for2, outcome.points1, side1);
            }
            if let Some(row) = table.get_mut(&m.team2) {
                row.record(outcome.shots_for2, outcome.shots_for1, outcome.points2, side1.reverse());
            }
            counted += 1;
        }
    }

    debug!("Standings computed from {} counted matches, {} teams", counted, table.len());

    let mut rows: Vec<StandingRow> = table.into_values().collect();
    rows.sort_by(compare_rows);
    rows
}

/// Standings for a whole tournament.
///
/// Same as [`compute_standings`], with a zero row added for every roster
/// team that has not appeared in a match yet.
pub fn standings_for(tournament: &Tournament, options: StandingsOptions) -> Vec<StandingRow> {
    let mut rows = compute_standings(&tournament.rounds, tournament.scoring_mode, options);

    for team in &tournament.teams {
        if !rows.iter().any(|r| &r.team == team) {
            rows.push(StandingRow::new(team.clone()));
        }
    }

    rows.sort_by(compare_rows);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::{Match, Resource, ScoreCard, Skin};

    fn played(t1: &str, t2: &str, s1: u32, s2: u32, verified: bool) -> Match {
        let mut m = Match::new(t1.into(), t2.into(), Resource::new('A', 1), ScoringMode::Standard);
        m.scores = ScoreCard::Standard {
            score1: Some(s1),
            score2: Some(s2),
        };
        m.verified = verified;
        m
    }

    fn row<'a>(rows: &'a [StandingRow], team: &str) -> &'a StandingRow {
        rows.iter()
            .find(|r| r.team.as_str() == team)
            .expect("team present in standings")
    }

    #[test]
    fn test_basic_accumulation() {
        let rounds = vec![Round::new(vec![played("A", "B", 7, 5, true), played("C", "D", 3, 3, true)])];
        let rows = compute_standings(&rounds, ScoringMode::Standard, StandingsOptions::default());

        let a = row(&rows, "A");
        assert_eq!((a.played, a.won, a.drawn, a.lost), (1, 1, 0, 0));
        assert_eq!((a.shots_for, a.shots_against, a.diff), (7, 5, 2));
        assert_eq!(a.points, Points::whole(2));

        let b = row(&rows, "B");
        assert_eq!((b.lost, b.diff, b.points), (1, -2, Points::ZERO));

        let c = row(&rows, "C");
        assert_eq!((c.drawn, c.points), (1, Points::whole(1)));

        assert_eq!(rows[0].team.as_str(), "A");
        assert_eq!(rows[3].team.as_str(), "B");
    }

    #[test]
    fn test_unverified_skipped_by_default() {
        let rounds = vec![Round::new(vec![played("A", "B", 7, 5, false)])];

        let strict = compute_standings(&rounds, ScoringMode::Standard, StandingsOptions::default());
        assert_eq!(strict.len(), 2);
        assert!(strict.iter().all(|r| r.played == 0));

        let provisional = compute_standings(&rounds, ScoringMode::Standard, StandingsOptions::provisional());
        assert_eq!(row(&provisional, "A").won, 1);
    }

    #[test]
    fn test_tie_break_shots_for_then_name() {
        // Beta and Alpha: 2 points, +2 diff, Beta has more shots for
        // Gamma and Delta: identical lines, ordered by name
        let rounds = vec![Round::new(vec![
            played("Alpha", "X", 5, 3, true),
            played("Beta", "Y", 9, 7, true),
            played("Gamma", "Z", 4, 2, true),
            played("Delta", "W", 4, 2, true),
        ])];

        for _ in 0..3 {
            let rows = compute_standings(&rounds, ScoringMode::Standard, StandingsOptions::default());
            let order: Vec<&str> = rows.iter().take(4).map(|r| r.team.as_str()).collect();
            assert_eq!(order, vec!["Beta", "Alpha", "Delta", "Gamma"]);
        }
    }

    #[test]
    fn test_partial_skins_not_accumulated() {
        let mut m = Match::new("A".into(), "B".into(), Resource::new('A', 1), ScoringMode::Skins);
        m.scores = ScoreCard::Skins {
            skins: [Skin::new(5, 0), Skin::new(4, 1), Skin::default()],
        };
        m.verified = true;

        let rows = compute_standings(&[Round::new(vec![m])], ScoringMode::Skins, StandingsOptions::default());
        let a = row(&rows, "A");
        assert_eq!((a.played, a.shots_for, a.points), (0, 0, Points::ZERO));
    }

    #[test]
    fn test_skins_points_accumulate_uncapped() {
        let mut m = Match::new("A".into(), "B".into(), Resource::new('A', 1), ScoringMode::Skins);
        m.scores = ScoreCard::Skins {
            skins: [Skin::new(3, 2), Skin::new(1, 4), Skin::new(5, 5)],
        };
        m.verified = true;

        let rows = compute_standings(&[Round::new(vec![m])], ScoringMode::Skins, StandingsOptions::default());
        let a = row(&rows, "A");
        let b = row(&rows, "B");
        assert_eq!((a.points, a.lost, a.shots_for), (Points::from_halves(3), 1, 9));
        assert_eq!((b.points, b.won, b.shots_for), (Points::from_halves(7), 1, 11));
        assert_eq!(rows[0].team.as_str(), "B");
    }

    #[test]
    fn test_malformed_match_skipped() {
        let mut bad = played("A", "B", 7, 5, true);
        bad.team1 = Team::default();
        let rows = compute_standings(&[Round::new(vec![bad])], ScoringMode::Standard, StandingsOptions::default());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_diff_matches_shots() {
        let rounds = vec![
            Round::new(vec![played("A", "B", 10, 2, true)]),
            Round::new(vec![played("B", "A", 8, 3, true)]),
        ];
        let rows = compute_standings(&rounds, ScoringMode::Standard, StandingsOptions::default());
        for r in &rows {
            assert_eq!(r.diff, i64::from(r.shots_for) - i64::from(r.shots_against));
            assert_eq!(r.played, r.won + r.drawn + r.lost);
        }
    }

    #[test]
    fn test_huge_stored_shots_do_not_panic() {
        let rounds = vec![
            Round::new(vec![played("A", "B", u32::MAX, 1, true)]),
            Round::new(vec![played("A", "B", u32::MAX, 2, true)]),
        ];
        let rows = compute_standings(&rounds, ScoringMode::Standard, StandingsOptions::default());
        let a = row(&rows, "A");
        assert_eq!((a.played, a.won, a.shots_for, a.shots_against), (2, 2, u32::MAX, 3));
        assert_eq!(a.diff, i64::from(u32::MAX) - 3);
    }
}
