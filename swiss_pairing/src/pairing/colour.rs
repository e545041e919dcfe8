//! Colour allocation for confirmed pairs.

use crate::{
    history::{Colour, PlayerCard},
    tournament::{StartNo, Table},
};

/// Most games in a row a player may have with the same colour
const MAX_COLOUR_STREAK: usize = 2;

/// White and black side of one board
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ColourAssignment {
    pub white: StartNo,
    pub black: StartNo,
}

impl ColourAssignment {
    /// Colour given to `start_no`, `Colour::None` if not part of this board
    pub fn colour_of(&self, start_no: StartNo) -> Colour {
        if start_no == self.white {
            Colour::White
        } else if start_no == self.black {
            Colour::Black
        } else {
            Colour::None
        }
    }

    pub fn into_table(self, table_no: u32) -> Table {
        Table {
            table_no,
            white: self.white,
            black: self.black,
        }
    }
}

/// Decides colours for one round. Holds no state besides the round number.
#[derive(Clone, Copy, Debug)]
pub struct ColourAllocator {
    round_no: u32,
}

impl ColourAllocator {
    pub fn new(round_no: u32) -> Self {
        Self { round_no }
    }

    /// Allocate colours for a pair; `higher` is the higher-ranked player.
    ///
    /// 1. Complementary preferences are granted.
    /// 2. Otherwise the player with the lower colour difference gets white.
    /// 3. Otherwise the higher-ranked player gets white on odd rounds, black on even.
    pub fn allocate(&self, higher: &PlayerCard, lower: &PlayerCard) -> ColourAssignment {
        let higher_wants = higher.preferred_colour();
        let lower_wants = lower.preferred_colour();
        if higher_wants != Colour::None && lower_wants == higher_wants.opposite() {
            return Self::give(higher, lower, higher_wants);
        }

        match higher.colour_difference.cmp(&lower.colour_difference) {
            std::cmp::Ordering::Less => Self::give(higher, lower, Colour::White),
            std::cmp::Ordering::Greater => Self::give(higher, lower, Colour::Black),
            std::cmp::Ordering::Equal if self.round_no % 2 == 1 => {
                Self::give(higher, lower, Colour::White)
            }
            std::cmp::Ordering::Equal => Self::give(higher, lower, Colour::Black),
        }
    }

    /// Whether giving `colour` to `card` pushes it past the colour balance bounds:
    /// a colour difference beyond `max_difference` or a third game in a row with
    /// the same colour.
    pub fn breaks_balance(card: &PlayerCard, colour: Colour, max_difference: u32) -> bool {
        let difference = card.colour_difference + colour.balance();
        if difference.unsigned_abs() > max_difference {
            return true;
        }
        colour != Colour::None
            && colour == card.last_colour
            && card.colour_streak() >= MAX_COLOUR_STREAK
    }

    fn give(higher: &PlayerCard, lower: &PlayerCard, higher_colour: Colour) -> ColourAssignment {
        if higher_colour == Colour::White {
            ColourAssignment {
                white: higher.start_no,
                black: lower.start_no,
            }
        } else {
            ColourAssignment {
                white: lower.start_no,
                black: higher.start_no,
            }
        }
    }
}
