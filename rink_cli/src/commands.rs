//! Subcommands and their terminal output.

use anyhow::{Context, Result, bail};
use log::warn;
use rink_engine::gateway::{Actor, MatchPatch, MatchRef, ScoreField, ScoreLink};
use rink_engine::service::{EngineError, TournamentService};
use rink_engine::standings::{StandingRow, StandingsOptions, standings_for};
use rink_engine::store::TournamentStore;
use rink_engine::summary::MatchLocation;
use rink_engine::tournament::{Match, Resource, ScoreCard, ScoringMode, Side, Tournament};

/// Attempts for an organizer edit that keeps losing revision races
const MAX_EDIT_ATTEMPTS: u32 = 3;

/// A parsed `rink` invocation
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    New {
        name: String,
        teams: Vec<String>,
        mode: ScoringMode,
    },
    List,
    Round {
        name: String,
    },
    Show {
        name: String,
        round: Option<usize>,
    },
    Edit {
        name: String,
        round: usize,
        rink: Resource,
        patch: MatchPatch,
    },
    Player {
        link: ScoreLink,
        patch: MatchPatch,
    },
    Standings {
        name: String,
        provisional: bool,
    },
    Summary {
        name: String,
    },
    Delete {
        name: String,
    },
}

/// Parse `score1`, `score2` or `skinN.a` / `skinN.b` (N is 1-based)
pub fn parse_field(raw: &str) -> Result<ScoreField> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "score1" => Ok(ScoreField::Score1),
        "score2" => Ok(ScoreField::Score2),
        other => {
            let Some((skin, side)) = other.strip_prefix("skin").and_then(|rest| rest.split_once('.')) else {
                bail!("unknown score field '{raw}' (expected score1, score2 or skinN.a / skinN.b)");
            };
            let number: usize = skin.parse().with_context(|| format!("bad skin number in '{raw}'"))?;
            if number == 0 {
                bail!("skins are numbered from 1");
            }
            let side = match side {
                "a" => Side::A,
                "b" => Side::B,
                _ => bail!("skin side must be 'a' or 'b' in '{raw}'"),
            };
            Ok(ScoreField::Skin {
                index: number - 1,
                side,
            })
        }
    }
}

/// Run one command against the service
pub async fn run<S: TournamentStore>(service: &TournamentService<S>, command: Command) -> Result<()> {
    match command {
        Command::New { name, teams, mode } => {
            let tournament = service.create_tournament(&name, &teams, mode).await?;
            println!(
                "Created {} tournament '{}' with {} teams",
                tournament.scoring_mode,
                tournament.name,
                tournament.teams.len()
            );
        }
        Command::List => {
            let all = service.tournaments().await?;
            if all.is_empty() {
                println!("No tournaments");
            }
            for t in all {
                println!(
                    "{:<24} {:<8} {:>2} teams  {:>2} rounds  created {}",
                    t.name,
                    t.scoring_mode.to_string(),
                    t.teams.len(),
                    t.rounds.len(),
                    t.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        Command::Round { name } => {
            let tournament = service.generate_next_round(&name).await?;
            if let Some(index) = tournament.latest_round_index() {
                print_round(&tournament, index);
            }
        }
        Command::Show { name, round } => {
            let tournament = service.tournament(&name).await?;
            match round {
                Some(number) => {
                    if number == 0 || tournament.round(number - 1).is_none() {
                        bail!("'{}' has no round {}", tournament.name, number);
                    }
                    print_round(&tournament, number - 1);
                }
                None if tournament.rounds.is_empty() => println!("No rounds generated yet"),
                None => (0..tournament.rounds.len()).for_each(|i| print_round(&tournament, i)),
            }
        }
        Command::Edit {
            name,
            round,
            rink,
            patch,
        } => {
            let tournament = edit_with_reload(service, &name, round, rink, &patch).await?;
            print_round(&tournament, round);
        }
        Command::Player { link, patch } => {
            let current = service.tournament(&link.tournament).await?;
            let tournament = service.patch_from_link(&link, &patch, current.revision).await?;
            let round = link.round_index(&tournament)?;
            print_round(&tournament, round);
        }
        Command::Standings { name, provisional } => {
            let tournament = service.tournament(&name).await?;
            let options = if provisional {
                StandingsOptions::provisional()
            } else {
                service.config().standings
            };
            print_standings(&tournament, &standings_for(&tournament, options), options);
        }
        Command::Summary { name } => {
            let summary = service.summary(&name).await?;
            println!("{} ({} teams)", summary.name, summary.teams);
            println!(
                "Progress: {}% ({} of {} matches scored, {} verified, {} rounds)",
                summary.progress_percent,
                summary.completed_matches,
                summary.total_matches,
                summary.verified_matches,
                summary.rounds
            );
            print_locations("Completed", &summary.completed);
            print_locations("Still to play", &summary.pending);
        }
        Command::Delete { name } => {
            service.delete_tournament(&name).await?;
            println!("Deleted '{name}'");
        }
    }

    Ok(())
}

/// Organizer edit at the current revision, reloading when another writer got in first
async fn edit_with_reload<S: TournamentStore>(
    service: &TournamentService<S>,
    name: &str,
    round: usize,
    rink: Resource,
    patch: &MatchPatch,
) -> Result<Tournament, EngineError> {
    let mut attempt = 1;
    loop {
        let current = service.tournament(name).await?;
        match service
            .patch_match(name, round, &MatchRef::Resource(rink), patch, current.revision, Actor::Organizer)
            .await
        {
            Err(e) if e.is_retryable() && attempt < MAX_EDIT_ATTEMPTS => {
                warn!("Edit of '{}' raced another writer ({}), reloading", name, e);
                attempt += 1;
            }
            result => return result,
        }
    }
}

fn print_round(tournament: &Tournament, index: usize) {
    let Some(round) = tournament.round(index) else {
        return;
    };

    println!("Round {}", index + 1);
    for m in round {
        println!(
            "  {:<4} {:<20} v {:<20} {}{}",
            m.resource.to_string(),
            m.team1,
            m.team2,
            describe_scores(m),
            if m.verified { "  [verified]" } else { "" }
        );
    }
    for team in tournament.sitting_out(index) {
        println!("  bye  {team}");
    }
}

fn describe_scores(m: &Match) -> String {
    let shot = |v: Option<u32>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
    match &m.scores {
        ScoreCard::Standard { score1, score2 } => format!("{} : {}", shot(*score1), shot(*score2)),
        ScoreCard::Skins { skins } => {
            let cells: Vec<String> = skins
                .iter()
                .map(|s| format!("{}:{}", shot(s.a), shot(s.b)))
                .collect();
            match m.skins_totals().filter(|_| m.scores.has_entries()) {
                Some(t) => format!(
                    "{}  shots {}:{}  pts {}:{}",
                    cells.join(" "),
                    t.total_a,
                    t.total_b,
                    t.match_points_a,
                    t.match_points_b
                ),
                None => cells.join(" "),
            }
        }
    }
}

fn print_standings(tournament: &Tournament, rows: &[StandingRow], options: StandingsOptions) {
    let label = if options.require_verified {
        "verified results"
    } else {
        "provisional, includes unverified results"
    };
    println!("{} standings ({label})", tournament.name);
    println!(
        "  {:>3}  {:<20} {:>2} {:>2} {:>2} {:>2} {:>5} {:>5} {:>5} {:>5}",
        "#", "Team", "P", "W", "D", "L", "For", "Agst", "Diff", "Pts"
    );
    for (position, row) in rows.iter().enumerate() {
        println!(
            "  {:>3}  {:<20} {:>2} {:>2} {:>2} {:>2} {:>5} {:>5} {:>+5} {:>5}",
            position + 1,
            row.team,
            row.played,
            row.won,
            row.drawn,
            row.lost,
            row.shots_for,
            row.shots_against,
            row.diff,
            row.points.to_string()
        );
    }
}

fn print_locations(title: &str, locations: &[MatchLocation]) {
    if locations.is_empty() {
        return;
    }
    println!("{title}:");
    for l in locations {
        let points = l
            .points
            .map(|(p1, p2)| format!("  {p1} - {p2}"))
            .unwrap_or_default();
        println!("  R{} {:<4} {} v {}{}", l.round, l.resource.to_string(), l.team1, l.team2, points);
    }
}
