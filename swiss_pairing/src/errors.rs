//! Pairing error types.

use thiserror::Error;

use crate::{score::Score, tournament::StartNo};

/// Errors that reject a pairing request
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PairingError {
    /// The configured round count is already reached
    #[error("all rounds already paired: {played} of {configured}")]
    AllRoundsPaired { played: u32, configured: u32 },

    /// A recorded result or bye is not a legal number of points
    #[error("round {round_no}: invalid result of {points} points for player {start_no}")]
    InvalidResult {
        round_no: u32,
        start_no: StartNo,
        points: f64,
    },

    /// A player appears twice within one round
    #[error("round {round_no}: player {start_no} is placed more than once")]
    DuplicatePlacement { round_no: u32, start_no: StartNo },

    /// A game or bye names a player who is not registered
    #[error("round {round_no}: unknown player {start_no}")]
    UnknownPlayer { round_no: u32, start_no: StartNo },

    /// A game names the same player on both sides
    #[error("round {round_no}: player {start_no} is paired against themselves")]
    SelfPairing { round_no: u32, start_no: StartNo },

    /// No legal placement exists for the remaining players
    #[error("round {round_no}: no legal pairing for the bracket with score {score}")]
    UnsolvableBracket { round_no: u32, score: Score },

    /// The caller gave up on the computation
    #[error("pairing computation cancelled")]
    Cancelled,
}

impl PairingError {
    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            PairingError::AllRoundsPaired { .. } => "AllRoundsPaired",
            PairingError::InvalidResult { .. } => "InvalidResult",
            PairingError::DuplicatePlacement { .. } => "DuplicatePlacement",
            PairingError::UnknownPlayer { .. } => "UnknownPlayer",
            PairingError::SelfPairing { .. } => "SelfPairing",
            PairingError::UnsolvableBracket { .. } => "UnsolvableBracket",
            PairingError::Cancelled => "Cancelled",
        }
    }

    /// Whether the error points at corrupted tournament data
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            PairingError::InvalidResult { .. }
                | PairingError::DuplicatePlacement { .. }
                | PairingError::UnknownPlayer { .. }
                | PairingError::SelfPairing { .. }
        )
    }
}

/// Result type for pairing operations
pub type PairingResult<T> = Result<T, PairingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PairingError::AllRoundsPaired {
            played: 3,
            configured: 3,
        };
        assert_eq!(err.to_string(), "all rounds already paired: 3 of 3");

        let err = PairingError::UnsolvableBracket {
            round_no: 4,
            score: Score::from_half_points(3),
        };
        assert!(err.to_string().contains("score 1.5"));
    }

    #[test]
    fn test_kind_and_data_classification() {
        let err = PairingError::InvalidResult {
            round_no: 1,
            start_no: 2,
            points: 0.3,
        };
        assert_eq!(err.kind(), "InvalidResult");
        assert!(err.is_data_error());
        assert!(!PairingError::Cancelled.is_data_error());
    }
}
