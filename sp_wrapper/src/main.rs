//! Tournament file manager for the Swiss pairing engine.
//!
//! Without a subcommand the wrapper pairs the next round of a tournament file,
//! either in-process or through a pairing server.

use anyhow::{Context, Result};
use pico_args::Arguments;
use std::path::PathBuf;
use swiss_pairing::{PairingConfig, PairingEngine};

use sp_wrapper::{
    api_client::{ApiClient, Pairer},
    commands::{self, DEFAULT_ROUNDS},
    store,
};

const HELP: &str = "\
Manage a Swiss tournament file and pair its rounds

USAGE:
  sp_wrapper [--server URL] <FILE>                 Pair the next round
  sp_wrapper init <FILE> [--rounds N]              Create an empty tournament [default rounds: 5]
  sp_wrapper add-player <FILE> <NAME>              Register a player
  sp_wrapper result <FILE> --round R --table T --score W-B
                                                   Record a result (e.g. 1-0, 0.5-0.5, 0-1)
  sp_wrapper withdraw <FILE> --player N --round R [--bye P]
                                                   Withdraw a player from one round
  sp_wrapper show <FILE>                           Print rounds and standings

OPTIONS:
  --server URL          Pair through a pairing server instead of in-process

FLAGS:
  -h, --help            Print help information
";

enum Command {
    Pair { file: PathBuf, server: Option<String> },
    Init { file: PathBuf, rounds: u32 },
    AddPlayer { file: PathBuf, name: String },
    Result { file: PathBuf, round: u32, table: u32, score: (f64, f64) },
    Withdraw { file: PathBuf, player: u32, round: u32, bye: Option<f64> },
    Show { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let command = parse_args(&mut pargs)?;
    let remaining = pargs.finish();
    if !remaining.is_empty() {
        anyhow::bail!("Unexpected arguments: {:?}", remaining);
    }

    run(command).await
}

fn parse_args(pargs: &mut Arguments) -> Result<Command> {
    let server: Option<String> = pargs.opt_value_from_str("--server")?;
    let Some(first) = pargs.subcommand()? else {
        eprint!("{HELP}");
        anyhow::bail!("Missing tournament file");
    };

    let command = match first.as_str() {
        "init" => Command::Init {
            rounds: pargs
                .opt_value_from_str("--rounds")?
                .unwrap_or(DEFAULT_ROUNDS),
            file: pargs.free_from_str()?,
        },
        "add-player" => Command::AddPlayer {
            file: pargs.free_from_str()?,
            name: pargs.free_from_str()?,
        },
        "result" => Command::Result {
            round: pargs.value_from_str("--round")?,
            table: pargs.value_from_str("--table")?,
            score: pargs.value_from_fn("--score", commands::parse_score)?,
            file: pargs.free_from_str()?,
        },
        "withdraw" => Command::Withdraw {
            player: pargs.value_from_str("--player")?,
            round: pargs.value_from_str("--round")?,
            bye: pargs.opt_value_from_str("--bye")?,
            file: pargs.free_from_str()?,
        },
        "show" => Command::Show {
            file: pargs.free_from_str()?,
        },
        file => Command::Pair {
            file: PathBuf::from(file),
            server,
        },
    };
    Ok(command)
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Pair { file, server } => {
            let pairer = match server {
                Some(url) => Pairer::Remote(ApiClient::new(url)),
                None => Pairer::Local(PairingEngine::new(
                    PairingConfig::from_env().context("Invalid pairing configuration")?,
                )),
            };
            commands::pair_next_round(&file, &pairer).await?;
            println!("Tournament updated successfully.");
        }
        Command::Init { file, rounds } => {
            commands::init(&file, rounds)?;
            println!("Created {} with {} rounds.", file.display(), rounds);
        }
        Command::AddPlayer { file, name } => {
            let start_no = commands::add_player(&file, &name)?;
            println!("Registered {} as player {}.", name, start_no);
        }
        Command::Result {
            file,
            round,
            table,
            score,
        } => {
            commands::record_result(&file, round, table, score)?;
            println!("Recorded round {} table {}.", round, table);
        }
        Command::Withdraw {
            file,
            player,
            round,
            bye,
        } => {
            commands::withdraw(&file, player, round, bye)?;
            println!("Player {} withdrawn from round {}.", player, round);
        }
        Command::Show { file } => {
            let tournament = store::load(&file)?;
            print!("{}", commands::render(&tournament));
        }
    }
    Ok(())
}
