//! Tournament records exchanged with clients.
//!
//! This module holds the persisted shape of a Swiss tournament:
//! - Players and their withdrawals
//! - Rounds made of games and byes
//! - The `CalculatePairing` request and response
//!
//! ## Example
//!
//! ```
//! use swiss_pairing::tournament::Tournament;
//!
//! let mut tournament = Tournament::new(5);
//! tournament.add_player("Alice");
//! tournament.add_player("Bob");
//! assert_eq!(tournament.next_round_no(), 1);
//! ```

pub mod models;

pub use models::{
    Bye, ByeKind, CalculatePairingRequest, CalculatePairingResponse, EmptyTable, Game,
    GameResult, Pairing, Player, Round, StartNo, Table, Tournament, Withdrawal,
};
