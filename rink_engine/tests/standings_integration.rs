//! Integration tests for standings over multi-round tournaments
//!
//! Results are entered through the patch gateway, the way a host would, and
//! the resulting table is checked against hand-computed totals.

use chrono::Utc;
use rink_engine::gateway::{Actor, MatchPatch, MatchRef, ScoreField, apply_match_patch};
use rink_engine::scoring::Points;
use rink_engine::standings::{StandingRow, StandingsOptions, compute_standings, standings_for};
use rink_engine::tournament::{Match, Resource, Round, ScoringMode, Side, Team, Tournament};

fn fixture(t1: &str, t2: &str, rink: u32, mode: ScoringMode) -> Match {
    Match::new(t1.into(), t2.into(), Resource::new('A', rink), mode)
}

fn row<'a>(rows: &'a [StandingRow], team: &str) -> &'a StandingRow {
    rows.iter()
        .find(|r| r.team.as_str() == team)
        .expect("team present in standings")
}

fn enter(tournament: Tournament, round: usize, index: usize, patch: MatchPatch) -> Tournament {
    let revision = tournament.revision;
    apply_match_patch(&tournament, round, &MatchRef::Index(index), &patch, revision, Actor::Organizer)
        .expect("patch accepted")
}

fn standard_result(s1: u32, s2: u32) -> MatchPatch {
    MatchPatch::new()
        .set(ScoreField::Score1, s1)
        .set(ScoreField::Score2, s2)
        .verify()
}

fn skins_result(skins: [(u32, u32); 3]) -> MatchPatch {
    skins
        .iter()
        .enumerate()
        .fold(MatchPatch::new(), |patch, (index, &(a, b))| {
            patch
                .set(ScoreField::Skin { index, side: Side::A }, a)
                .set(ScoreField::Skin { index, side: Side::B }, b)
        })
        .verify()
}

#[test]
fn test_standard_two_round_table() {
    let mut t = Tournament::new("League", ["North", "South", "East", "West"], ScoringMode::Standard, Utc::now())
        .expect("valid");
    t.push_round(Round::new(vec![
        fixture("North", "South", 1, ScoringMode::Standard),
        fixture("East", "West", 2, ScoringMode::Standard),
    ]));
    t.push_round(Round::new(vec![
        fixture("North", "East", 2, ScoringMode::Standard),
        fixture("South", "West", 1, ScoringMode::Standard),
    ]));

    let t = enter(t, 0, 0, standard_result(14, 9));
    let t = enter(t, 0, 1, standard_result(11, 11));
    let t = enter(t, 1, 0, standard_result(8, 12));
    let t = enter(t, 1, 1, standard_result(15, 6));

    let rows = standings_for(&t, StandingsOptions::default());
    let order: Vec<&str> = rows.iter().map(|r| r.team.as_str()).collect();
    // East 3 pts (+4), North 2 pts (+1), South 2 pts (+4), West 1 pt (-9)
    assert_eq!(order, vec!["East", "South", "North", "West"]);

    let east = row(&rows, "East");
    assert_eq!((east.played, east.won, east.drawn, east.lost), (2, 1, 1, 0));
    assert_eq!(east.points, Points::whole(3));

    let west = row(&rows, "West");
    assert_eq!((west.shots_for, west.shots_against, west.diff), (17, 26, -9));

    let total_diff: i64 = rows.iter().map(|r| r.diff).sum();
    assert_eq!(total_diff, 0);
}

#[test]
fn test_unverified_results_are_provisional() {
    let mut t = Tournament::new("League", ["A", "B"], ScoringMode::Standard, Utc::now()).expect("valid");
    t.push_round(Round::new(vec![fixture("A", "B", 1, ScoringMode::Standard)]));
    let t = enter(
        t,
        0,
        0,
        MatchPatch::new().set(ScoreField::Score1, 7).set(ScoreField::Score2, 3),
    );

    let official = standings_for(&t, StandingsOptions::default());
    assert!(official.iter().all(|r| r.played == 0));

    let provisional = standings_for(&t, StandingsOptions::provisional());
    assert_eq!(row(&provisional, "A").points, Points::whole(2));
    assert_eq!(provisional[0].team, Team::from("A"));
}

#[test]
fn test_skins_table_with_half_points() {
    let mut t = Tournament::new("Skins Night", ["Reds", "Blues", "Greens", "Golds"], ScoringMode::Skins, Utc::now())
        .expect("valid");
    t.push_round(Round::new(vec![
        fixture("Reds", "Blues", 1, ScoringMode::Skins),
        fixture("Greens", "Golds", 2, ScoringMode::Skins),
    ]));

    let t = enter(t, 0, 0, skins_result([(3, 2), (1, 4), (5, 5)]));
    let t = enter(t, 0, 1, skins_result([(6, 0), (5, 1), (4, 2)]));

    let rows = compute_standings(&t.rounds, t.scoring_mode, StandingsOptions::default());
    assert_eq!(row(&rows, "Reds").points, Points::from_halves(3));
    assert_eq!(row(&rows, "Blues").points, Points::from_halves(7));
    assert_eq!(row(&rows, "Greens").points, Points::whole(5));
    assert_eq!(row(&rows, "Golds").points, Points::ZERO);

    assert_eq!(rows[0].team, Team::from("Greens"));
    assert_eq!(rows[1].team, Team::from("Blues"));
    assert_eq!(row(&rows, "Blues").won, 1);
    assert_eq!(row(&rows, "Reds").lost, 1);
}

#[test]
fn test_standings_json_shape() {
    let mut t = Tournament::new("League", ["A", "B"], ScoringMode::Skins, Utc::now()).expect("valid");
    t.push_round(Round::new(vec![fixture("A", "B", 1, ScoringMode::Skins)]));
    let t = enter(t, 0, 0, skins_result([(3, 2), (1, 4), (5, 5)]));

    let rows = standings_for(&t, StandingsOptions::default());
    let json = serde_json::to_value(&rows).expect("serializes");
    assert_eq!(json[0]["team"], "B");
    assert_eq!(json[0]["points"], 3.5);
    assert_eq!(json[0]["shotsFor"], 11);
    assert_eq!(json[1]["points"], 1.5);
}
