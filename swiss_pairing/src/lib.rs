//! # Swiss Pairing
//!
//! A Swiss-system tournament pairing engine.
//!
//! Given the rounds played so far, the engine computes the next round: who meets
//! whom, with which colours, and who gets a bye. Every request is computed from
//! scratch out of the tournament snapshot it carries.
//!
//! ## Pipeline
//!
//! - **HistoryBuilder**: replays recorded rounds into per-player cards (opponents,
//!   colours, floats, cumulative score)
//! - **Withdrawal filter**: players withdrawn from the round get a withdrawal-bye
//! - **BracketBuilder**: groups the remaining players into score brackets
//! - **PairingResolver**: pairs brackets top-down, downfloating leftovers
//! - **ColourAllocator / ByeAssigner**: colours per table, pairing-bye recipient
//! - **ResultAssembler**: numbers tables and byes
//!
//! ## Core Modules
//!
//! - [`tournament`]: persisted tournament records and the request/response types
//! - [`history`]: player cards derived from recorded rounds
//! - [`brackets`]: score groups and brackets
//! - [`pairing`]: the resolver and its collaborators
//!
//! ## Example
//!
//! ```
//! use swiss_pairing::{CalculatePairingRequest, PairingEngine, Tournament};
//!
//! let mut tournament = Tournament::new(3);
//! for name in ["Ann", "Ben", "Cid", "Dee"] {
//!     tournament.add_player(name);
//! }
//!
//! let engine = PairingEngine::default();
//! let response = engine
//!     .calculate_pairing(&CalculatePairingRequest { tournament })
//!     .unwrap();
//! assert_eq!(response.pairing.tables.len(), 2);
//! ```

/// Score groups and brackets.
pub mod brackets;
/// Cooperative cancellation.
pub mod cancel;
/// The `CalculatePairing` operation.
pub mod engine;
/// Error types.
pub mod errors;
/// Player history.
pub mod history;
/// Round pairing.
pub mod pairing;
/// Exact half-point scores.
pub mod score;
/// Tournament records.
pub mod tournament;

pub use cancel::CancelFlag;
pub use engine::PairingEngine;
pub use errors::{PairingError, PairingResult};
pub use pairing::PairingConfig;
pub use score::Score;
pub use tournament::{
    Bye, ByeKind, CalculatePairingRequest, CalculatePairingResponse, EmptyTable, Game,
    GameResult, Pairing, Player, Round, StartNo, Table, Tournament, Withdrawal,
};
