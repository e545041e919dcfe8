//! Tournament file commands.
//!
//! Each command loads the tournament file, changes it and writes it back.

use anyhow::{Context, Result};
use std::{fmt, path::Path};
use swiss_pairing::{Score, StartNo, Tournament, Withdrawal};

use crate::{api_client::Pairer, store};

/// Rounds of a tournament created without `--rounds`
pub const DEFAULT_ROUNDS: u32 = 5;

/// Errors that can occur while parsing command arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Score not of the form `W-B`
    InvalidScore(String),
    /// One side of a score is not 0, 0.5 or 1
    InvalidPoints(String),
    /// Both sides together do not add up to one point
    InvalidTotal(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidScore(value) => write!(
                f,
                "Invalid score '{}'. Use WHITE-BLACK (e.g., '1-0', '0.5-0.5', '0-1')",
                value
            ),
            Self::InvalidPoints(value) => write!(
                f,
                "Invalid points '{}'. Each side scores 0, 0.5 (or 1/2) or 1",
                value
            ),
            Self::InvalidTotal(value) => write!(
                f,
                "Invalid score '{}'. A game awards exactly one point in total",
                value
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a game score `W-B` into white and black points.
///
/// # Examples
///
/// ```
/// use sp_wrapper::commands::parse_score;
///
/// assert_eq!(parse_score("1-0"), Ok((1.0, 0.0)));
/// assert_eq!(parse_score("1/2-1/2"), Ok((0.5, 0.5)));
/// assert!(parse_score("2-0").is_err());
/// assert!(parse_score("0-0").is_err());
/// ```
pub fn parse_score(input: &str) -> Result<(f64, f64), ParseError> {
    let trimmed = input.trim();
    let (white, black) = trimmed
        .split_once('-')
        .ok_or_else(|| ParseError::InvalidScore(trimmed.to_string()))?;
    let (white, black) = (parse_points(white)?, parse_points(black)?);
    if white + black != Score::ONE {
        return Err(ParseError::InvalidTotal(trimmed.to_string()));
    }
    Ok((white.to_points(), black.to_points()))
}

/// Check that both sides of a game are legal and add up to one point
pub fn validate_result(white: f64, black: f64) -> Result<(), ParseError> {
    let side = |points: f64| {
        Score::from_game_points(points).ok_or_else(|| ParseError::InvalidPoints(points.to_string()))
    };
    if side(white)? + side(black)? != Score::ONE {
        return Err(ParseError::InvalidTotal(format!("{white}-{black}")));
    }
    Ok(())
}

fn parse_points(value: &str) -> Result<Score, ParseError> {
    let value = value.trim();
    let points = match value {
        "1/2" | "½" => 0.5,
        _ => value
            .parse::<f64>()
            .map_err(|_| ParseError::InvalidPoints(value.to_string()))?,
    };
    Score::from_game_points(points).ok_or_else(|| ParseError::InvalidPoints(value.to_string()))
}

/// Create an empty tournament file
pub fn init(path: &Path, rounds: u32) -> Result<()> {
    if rounds == 0 {
        anyhow::bail!("A tournament needs at least one round");
    }
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    store::save(path, &Tournament::new(rounds))
}

/// Register a player, returning the assigned starting number
pub fn add_player(path: &Path, name: &str) -> Result<StartNo> {
    let mut tournament = store::load(path)?;
    if !tournament.rounds.is_empty() {
        anyhow::bail!("Players cannot join after round 1 has been paired");
    }
    let start_no = tournament.add_player(name);
    store::save(path, &tournament)?;
    Ok(start_no)
}

/// Record the result of the game at `table_no` in `round_no`
pub fn record_result(
    path: &Path,
    round_no: u32,
    table_no: u32,
    (white, black): (f64, f64),
) -> Result<()> {
    validate_result(white, black)?;
    let mut tournament = store::load(path)?;
    let round = round_no
        .checked_sub(1)
        .and_then(|index| tournament.rounds.get_mut(index as usize))
        .with_context(|| format!("Round {round_no} has not been paired"))?;
    let game = round
        .game_mut(table_no)
        .with_context(|| format!("Round {round_no} has no table {table_no}"))?;
    game.record(white, black);
    store::save(path, &tournament)
}

/// Withdraw a player from one round, replacing any earlier withdrawal for it
pub fn withdraw(path: &Path, start_no: StartNo, round_no: u32, bye: Option<f64>) -> Result<()> {
    let mut tournament = store::load(path)?;
    if round_no == 0 || round_no > tournament.all_rounds_no {
        anyhow::bail!(
            "Round {round_no} is outside 1..={}",
            tournament.all_rounds_no
        );
    }
    if round_no <= tournament.rounds_played() {
        anyhow::bail!("Round {round_no} has already been paired");
    }
    if let Some(points) = bye {
        if Score::from_points(points).is_none() {
            anyhow::bail!(ParseError::InvalidPoints(points.to_string()));
        }
    }

    let player = tournament
        .player_mut(start_no)
        .with_context(|| format!("Unknown player {start_no}"))?;
    player.withdrawals.retain(|w| w.round_no != round_no);
    player.withdrawals.push(Withdrawal { round_no, bye });
    player.withdrawals.sort_by_key(|w| w.round_no);
    store::save(path, &tournament)
}

/// Pair the next round and append it to the file
pub async fn pair_next_round(path: &Path, pairer: &Pairer) -> Result<u32> {
    let mut tournament = store::load(path)?;
    let pairing = pairer.pair(&tournament).await?;
    tournament.append_pairing(pairing);
    store::save(path, &tournament)?;
    Ok(tournament.rounds_played())
}

/// One line of the standings table
#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    pub start_no: StartNo,
    pub identity: String,
    pub points: Score,
    pub games: u32,
}

/// Current standings from recorded results and byes; unfinished games count
/// nothing. Sorted by points, then by starting number.
pub fn standings(tournament: &Tournament) -> Vec<Standing> {
    let mut table: Vec<Standing> = tournament
        .players
        .iter()
        .map(|player| Standing {
            start_no: player.start_no,
            identity: player.identity.clone(),
            points: Score::ZERO,
            games: 0,
        })
        .collect();

    let mut credit = |start_no: StartNo, points: f64, played: bool| {
        if let Some(standing) = table.iter_mut().find(|s| s.start_no == start_no) {
            standing.points += Score::from_points(points).unwrap_or(Score::ZERO);
            if played {
                standing.games += 1;
            }
        }
    };

    for round in &tournament.rounds {
        for game in &round.games {
            if let Some(result) = game.white_result {
                credit(game.table.white, result.points, true);
            }
            if let Some(result) = game.black_result {
                credit(game.table.black, result.points, true);
            }
        }
        for empty in &round.byes {
            credit(empty.start_no, empty.bye.points, false);
        }
    }

    table.sort_by(|a, b| b.points.cmp(&a.points).then(a.start_no.cmp(&b.start_no)));
    table
}

/// Human-readable dump of rounds and standings
pub fn render(tournament: &Tournament) -> String {
    let mut out = format!(
        "Rounds: {} of {}\nPlayers: {}\n",
        tournament.rounds_played(),
        tournament.all_rounds_no,
        tournament.players.len()
    );

    let name = |start_no: StartNo| {
        tournament
            .player(start_no)
            .map_or_else(|| format!("#{start_no}"), |p| format!("{} ({})", p.identity, start_no))
    };
    let points = |result: Option<swiss_pairing::GameResult>| {
        result.map_or_else(|| "*".to_string(), |r| r.points.to_string())
    };

    for (index, round) in tournament.rounds.iter().enumerate() {
        out.push_str(&format!("\nRound {}\n", index + 1));
        for game in &round.games {
            out.push_str(&format!(
                "  {:>3}. {} - {}  {}-{}\n",
                game.table.table_no,
                name(game.table.white),
                name(game.table.black),
                points(game.white_result),
                points(game.black_result)
            ));
        }
        for empty in &round.byes {
            out.push_str(&format!(
                "  {:>3}. {}  {:?} bye, {} points\n",
                empty.table_no,
                name(empty.start_no),
                empty.bye.kind,
                empty.bye.points
            ));
        }
    }

    out.push_str("\nStandings\n");
    for (rank, standing) in standings(tournament).iter().enumerate() {
        out.push_str(&format!(
            "  {:>3}. {:<24} {:>5}  ({} games)\n",
            rank + 1,
            format!("{} ({})", standing.identity, standing.start_no),
            standing.points.to_string(),
            standing.games
        ));
    }
    out
}
