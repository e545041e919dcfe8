//! Player history derived from recorded rounds.
//!
//! Every pairing request rebuilds history from scratch:
//! - [`RoundCard`]: one player's opponent, colour, result and float in one round
//! - [`PlayerCard`]: all round cards of a player plus colour aggregates
//! - [`HistoryBuilder`]: replays the tournament's rounds into a [`History`]

pub mod builder;
pub mod cards;

pub use builder::{History, HistoryBuilder};
pub use cards::{Colour, Float, PlayerCard, RoundCard};
