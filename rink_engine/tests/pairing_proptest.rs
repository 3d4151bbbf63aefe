/// Property-based tests for pairing and standings using proptest
///
/// These tests generate arbitrary rosters, seeds and results and check the
/// invariants every generated round and every standings table must hold.
use chrono::Utc;
use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use rink_engine::pairing::PairingGenerator;
use rink_engine::scoring::{Points, score_match};
use rink_engine::standings::{StandingsOptions, compare_rows, standings_for};
use rink_engine::tournament::{Resource, Round, ScoreCard, ScoringMode, Skin, Tournament};
use std::collections::HashSet;

fn tournament(teams: usize, mode: ScoringMode) -> Tournament {
    let roster: Vec<String> = (0..teams).map(|i| format!("T{i}")).collect();
    Tournament::new("Prop", roster, mode, Utc::now()).expect("valid roster")
}

// Strategy for an optional shot count as entered on a scorecard
fn shots() -> impl Strategy<Value = Option<u32>> {
    prop::option::weighted(0.9, 0u32..30)
}

fn fill_scores(round: &mut Round, mode: ScoringMode, entries: &[(Option<u32>, Option<u32>)], verified: bool) {
    for (i, m) in round.matches.iter_mut().enumerate() {
        let pick = |k: usize| entries[(i * 3 + k) % entries.len()];
        m.scores = match mode {
            ScoringMode::Standard => {
                let (s1, s2) = pick(0);
                ScoreCard::Standard { score1: s1, score2: s2 }
            }
            ScoringMode::Skins => ScoreCard::Skins {
                skins: [0, 1, 2].map(|k| {
                    let (a, b) = pick(k);
                    Skin { a, b }
                }),
            },
        };
        m.verified = verified;
    }
}

fn mode_strategy() -> impl Strategy<Value = ScoringMode> {
    prop_oneof![Just(ScoringMode::Standard), Just(ScoringMode::Skins)]
}

proptest! {
    #[test]
    fn test_generated_rounds_are_well_formed(
        teams in 2usize..=24,
        rounds in 1usize..=5,
        seed in any::<u64>(),
        mode in mode_strategy(),
        entries in prop::collection::vec((shots(), shots()), 1..40),
    ) {
        let generator = PairingGenerator::default();
        let mut t = tournament(teams, mode);
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..rounds {
            let mut round = generator.generate_round_with_rng(&t, &mut rng).expect("round");

            prop_assert_eq!(round.len(), teams / 2);
            let mut seen = HashSet::new();
            let mut rinks: HashSet<Resource> = HashSet::new();
            for m in &round {
                prop_assert!(m.team1 != m.team2);
                prop_assert!(seen.insert(m.team1.clone()));
                prop_assert!(seen.insert(m.team2.clone()));
                prop_assert!(rinks.insert(m.resource));
                prop_assert!(!m.verified);
                prop_assert!(!m.scores.has_entries());
                prop_assert_eq!(m.scores.mode(), mode);
            }

            fill_scores(&mut round, mode, &entries, true);
            t.push_round(round);
        }
    }

    #[test]
    fn test_standings_are_consistent(
        teams in 2usize..=12,
        rounds in 1usize..=4,
        seed in any::<u64>(),
        mode in mode_strategy(),
        entries in prop::collection::vec((shots(), shots()), 1..40),
        verified in any::<bool>(),
    ) {
        let generator = PairingGenerator::default();
        let mut t = tournament(teams, mode);
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..rounds {
            let mut round = generator.generate_round_with_rng(&t, &mut rng).expect("round");
            fill_scores(&mut round, mode, &entries, verified);
            t.push_round(round);
        }

        for options in [StandingsOptions::default(), StandingsOptions::provisional()] {
            let rows = standings_for(&t, options);
            prop_assert_eq!(rows.len(), teams);

            for pair in rows.windows(2) {
                prop_assert_ne!(compare_rows(&pair[0], &pair[1]), std::cmp::Ordering::Greater);
            }

            let mut counted_points = Points::ZERO;
            let mut counted_matches = 0u32;
            for m in t.rounds.iter().flat_map(|r| r.iter()) {
                if options.require_verified && !m.verified {
                    continue;
                }
                let outcome = score_match(m, mode);
                if outcome.complete {
                    counted_points += outcome.points1 + outcome.points2;
                    counted_matches += 1;
                }
            }

            let table_points: Points = rows.iter().map(|r| r.points).sum();
            prop_assert_eq!(table_points, counted_points);
            prop_assert_eq!(rows.iter().map(|r| r.played).sum::<u32>(), counted_matches * 2);
            prop_assert_eq!(rows.iter().map(|r| r.diff).sum::<i64>(), 0);
            for r in &rows {
                prop_assert_eq!(r.won + r.drawn + r.lost, r.played);
                prop_assert_eq!(r.diff, i64::from(r.shots_for) - i64::from(r.shots_against));
            }
        }
    }
}
