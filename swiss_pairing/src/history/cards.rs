//! Per-player round records derived from tournament history.

use serde::{Deserialize, Serialize};

use crate::{
    score::Score,
    tournament::{ByeKind, StartNo},
};

/// Piece colour
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Colour {
    /// No game was played (bye or idle round)
    #[default]
    None,
    White,
    Black,
}

impl Colour {
    #[must_use]
    pub const fn opposite(self) -> Colour {
        match self {
            Colour::None => Colour::None,
            Colour::White => Colour::Black,
            Colour::Black => Colour::White,
        }
    }

    /// Contribution of a game in this colour to the colour difference
    #[must_use]
    pub const fn balance(self) -> i32 {
        match self {
            Colour::None => 0,
            Colour::White => 1,
            Colour::Black => -1,
        }
    }
}

/// Direction a player was moved relative to their own score
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Float {
    #[default]
    None,
    Up,
    Down,
}

impl Float {
    /// Float direction of `own` when meeting `opponent`, both taken before the round
    #[must_use]
    pub fn between(own: Score, opponent: Score) -> Float {
        match own.cmp(&opponent) {
            std::cmp::Ordering::Greater => Float::Down,
            std::cmp::Ordering::Less => Float::Up,
            std::cmp::Ordering::Equal => Float::None,
        }
    }
}

/// One player's record for one round
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RoundCard {
    /// `None` for byes and idle rounds
    pub opponent: Option<StartNo>,
    pub round_no: u32,
    pub colour: Colour,
    pub result: Score,
    pub float: Float,
    /// Score after this round
    pub cumulative: Score,
    /// Set when the round was a bye
    pub bye: Option<ByeKind>,
}

/// A player's full history
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerCard {
    pub start_no: StartNo,
    pub rounds: Vec<RoundCard>,
    /// White games minus black games
    pub colour_difference: i32,
    /// Colour of the most recent game actually played
    pub last_colour: Colour,
}

impl PlayerCard {
    pub fn new(start_no: StartNo) -> Self {
        Self {
            start_no,
            rounds: Vec::new(),
            colour_difference: 0,
            last_colour: Colour::None,
        }
    }

    /// Current total score
    pub fn score(&self) -> Score {
        self.rounds
            .last()
            .map_or(Score::ZERO, |round| round.cumulative)
    }

    /// Append a round and update the running aggregates
    pub(crate) fn push(&mut self, card: RoundCard) {
        if card.colour != Colour::None {
            self.colour_difference += card.colour.balance();
            self.last_colour = card.colour;
        }
        self.rounds.push(card);
    }

    pub fn has_met(&self, opponent: StartNo) -> bool {
        self.rounds.iter().any(|r| r.opponent == Some(opponent))
    }

    /// Float of the previous round
    pub fn last_float(&self) -> Float {
        self.rounds.last().map_or(Float::None, |r| r.float)
    }

    pub fn had_pairing_bye(&self) -> bool {
        self.rounds.iter().any(|r| r.bye == Some(ByeKind::Pairing))
    }

    /// Preferred colour for the next game: alternate from the last one played
    pub fn preferred_colour(&self) -> Colour {
        self.last_colour.opposite()
    }

    /// How many of the most recent played games were in `last_colour`
    ///
    /// Byes and idle rounds are skipped, they do not break a streak.
    pub fn colour_streak(&self) -> usize {
        if self.last_colour == Colour::None {
            return 0;
        }
        self.rounds
            .iter()
            .rev()
            .filter(|r| r.colour != Colour::None)
            .take_while(|r| r.colour == self.last_colour)
            .count()
    }
}
