//! Bye selection.

use super::config::PairingConfig;
use crate::{
    history::PlayerCard,
    score::Score,
    tournament::{Bye, ByeKind, StartNo},
};

/// A player excluded from pairing because of a withdrawal
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WithdrawalBye {
    pub start_no: StartNo,
    pub points: Score,
}

impl WithdrawalBye {
    pub fn bye(&self) -> Bye {
        Bye {
            points: self.points.to_points(),
            kind: ByeKind::Withdrawal,
        }
    }
}

/// Orders pairing-bye candidates and describes the bye they receive
#[derive(Clone, Copy, Debug)]
pub struct ByeAssigner {
    points: Score,
    track_previous: bool,
}

impl ByeAssigner {
    pub fn new(config: &PairingConfig) -> Self {
        Self {
            points: config.pairing_bye_points,
            track_previous: config.track_pairing_byes,
        }
    }

    /// Candidates in order of preference: lowest score first, ties by starting
    /// number. Players who already had a pairing-bye go last when tracked.
    pub fn candidates<'h>(&self, players: &[&'h PlayerCard]) -> Vec<&'h PlayerCard> {
        let mut candidates = players.to_vec();
        candidates.sort_by_key(|card| {
            (
                self.track_previous && card.had_pairing_bye(),
                card.score(),
                card.start_no,
            )
        });
        candidates
    }

    pub fn bye(&self) -> Bye {
        Bye {
            points: self.points.to_points(),
            kind: ByeKind::Pairing,
        }
    }
}
