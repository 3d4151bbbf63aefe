//! Command-line host for the rink pairing and standings engine.
//!
//! Tournaments live as JSON files in a data directory. Each invocation loads
//! the tournament it names, applies one operation through the engine and
//! saves it back with a revision check.

mod commands;
mod config;
mod store;

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Error, anyhow, bail};
use log::info;
use pico_args::Arguments;
use rink_engine::gateway::{MatchPatch, ScoreField, ScoreLink};
use rink_engine::service::TournamentService;
use rink_engine::tournament::{Resource, ScoringMode, Side};

use crate::commands::{Command, parse_field};
use crate::config::CliConfig;
use crate::store::JsonFileStore;

const HELP: &str = "\
Run lawn-bowls pairs tournaments from the terminal

USAGE:
  rink <COMMAND> [ARGS] [OPTIONS]

COMMANDS:
  new <NAME> <TEAM> <TEAM>...          Create a tournament  [--mode standard|skins]
  list                                 List tournaments
  round <NAME>                         Generate and save the next round
  show <NAME>                          Print fixtures and scores  [--round N]
  score <NAME> <ROUND> <RINK> <S1> <S2>
                                       Enter a standard result
  skin <NAME> <ROUND> <RINK> <SKIN> <A> <B>
                                       Enter one skin (SKIN is 1-3)
  set <NAME> <ROUND> <RINK> <FIELD> <VALUE>
                                       Set one field; VALUE '-' clears it
  verify <NAME> <ROUND> <RINK>         Lock a result
  unverify <NAME> <ROUND> <RINK>       Unlock a result for correction
  player <NAME> <RINK> <FIELD> <VALUE> Enter a score as a player  [--round N]
  standings <NAME>                     Print the table  [--all]
  summary <NAME>                       Print progress
  delete <NAME>                        Remove a tournament

  ROUND is 1-based. RINK is a label such as A3. FIELD is score1, score2,
  skin1.a, skin1.b, ... skin3.b.

OPTIONS:
  --data-dir   DIR         Tournament directory  [default: env RINK_DATA_DIR or ./rink-data]
  --mode       MODE        Scoring mode for 'new'  [default: env RINK_SCORING_MODE or standard]
  --round      N           Round for 'show' and 'player'  [default: all / latest]
  --all                    Standings include unverified results

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  RINK_ZONES               Green letters  [default: AB]
  RINK_RINKS_PER_ZONE      Rinks on each green  [default: 6]
  RINK_MAX_PAIRING_STEPS   Pairing search budget  [default: 200000]
  RINK_REQUIRE_VERIFIED    Standings count verified results only  [default: true]
  RINK_STORE_TIMEOUT_MS    Store call timeout  [default: 5000]
  RUST_LOG                 Log filter, e.g. info or debug
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let subcommand = pargs.subcommand()?.ok_or_else(|| anyhow!("missing command, see --help"))?;
    let data_dir: Option<PathBuf> = pargs.opt_value_from_str("--data-dir")?;

    env_logger::builder().format_target(false).init();

    let config = CliConfig::from_env(data_dir)?;
    config.validate()?;

    let command = parse_command(&subcommand, &mut pargs, &config)?;

    let store = Arc::new(JsonFileStore::new(config.data_dir.clone()));
    info!("Using tournament directory {}", store.dir().display());
    let service = TournamentService::new(store, config.engine);

    commands::run(&service, command).await
}

fn parse_command(subcommand: &str, pargs: &mut Arguments, config: &CliConfig) -> Result<Command, Error> {
    let command = match subcommand {
        "new" => {
            let mode: ScoringMode = pargs
                .opt_value_from_fn("--mode", str::parse::<ScoringMode>)?
                .unwrap_or(config.default_mode);
            let name: String = pargs.free_from_str()?;
            let teams = remaining(pargs)?;
            return Ok(Command::New { name, teams, mode });
        }
        "list" => Command::List,
        "round" => Command::Round {
            name: pargs.free_from_str()?,
        },
        "show" => {
            let round = pargs.opt_value_from_str("--round")?;
            Command::Show {
                name: pargs.free_from_str()?,
                round,
            }
        }
        "score" => {
            let (name, round, rink) = match_address(pargs)?;
            let s1: u32 = pargs.free_from_str()?;
            let s2: u32 = pargs.free_from_str()?;
            let patch = MatchPatch::new().set(ScoreField::Score1, s1).set(ScoreField::Score2, s2);
            Command::Edit {
                name,
                round,
                rink,
                patch,
            }
        }
        "skin" => {
            let (name, round, rink) = match_address(pargs)?;
            let skin: usize = pargs.free_from_str()?;
            if skin == 0 {
                bail!("skins are numbered from 1");
            }
            let a: u32 = pargs.free_from_str()?;
            let b: u32 = pargs.free_from_str()?;
            let index = skin - 1;
            let patch = MatchPatch::new()
                .set(ScoreField::Skin { index, side: Side::A }, a)
                .set(ScoreField::Skin { index, side: Side::B }, b);
            Command::Edit {
                name,
                round,
                rink,
                patch,
            }
        }
        "set" => {
            let (name, round, rink) = match_address(pargs)?;
            let patch = field_patch(pargs)?;
            Command::Edit {
                name,
                round,
                rink,
                patch,
            }
        }
        "verify" | "unverify" => {
            let (name, round, rink) = match_address(pargs)?;
            let patch = if subcommand == "verify" {
                MatchPatch::new().verify()
            } else {
                MatchPatch::new().unverify()
            };
            Command::Edit {
                name,
                round,
                rink,
                patch,
            }
        }
        "player" => {
            let round: Option<String> = pargs.opt_value_from_str("--round")?;
            let name: String = pargs.free_from_str()?;
            let rink: String = pargs.free_from_str()?;
            let link = ScoreLink::parse(&name, round.as_deref(), &rink)?;
            Command::Player {
                link,
                patch: field_patch(pargs)?,
            }
        }
        "standings" => {
            let provisional = pargs.contains("--all");
            Command::Standings {
                name: pargs.free_from_str()?,
                provisional,
            }
        }
        "summary" => Command::Summary {
            name: pargs.free_from_str()?,
        },
        "delete" => Command::Delete {
            name: pargs.free_from_str()?,
        },
        other => bail!("unknown command '{other}', see --help"),
    };

    let unused = remaining(pargs)?;
    if !unused.is_empty() {
        bail!("unexpected arguments: {}", unused.join(" "));
    }
    Ok(command)
}

/// `<NAME> <ROUND> <RINK>` with ROUND converted to a 0-based index
fn match_address(pargs: &mut Arguments) -> Result<(String, usize, Resource), Error> {
    let name: String = pargs.free_from_str()?;
    let round: usize = pargs.free_from_str()?;
    if round == 0 {
        bail!("rounds are numbered from 1");
    }
    let rink: Resource = pargs.free_from_str()?;
    Ok((name, round - 1, rink))
}

/// `<FIELD> <VALUE>`; a VALUE of `-` clears the field
fn field_patch(pargs: &mut Arguments) -> Result<MatchPatch, Error> {
    let field: String = pargs.free_from_str()?;
    let value: String = pargs.free_from_str()?;
    let field = parse_field(&field)?;

    if value == "-" {
        return Ok(MatchPatch::new().clear(field));
    }
    let value: u32 = value
        .parse()
        .with_context(|| format!("'{value}' is not a shot count"))?;
    Ok(MatchPatch::new().set(field, value))
}

fn remaining(pargs: &mut Arguments) -> Result<Vec<String>, Error> {
    std::mem::replace(pargs, Arguments::from_vec(Vec::new()))
        .finish()
        .into_iter()
        .map(|arg: OsString| {
            arg.into_string()
                .map_err(|arg| anyhow!("argument is not valid UTF-8: {}", arg.to_string_lossy()))
        })
        .collect()
}
