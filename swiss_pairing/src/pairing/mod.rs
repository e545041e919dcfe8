//! Round pairing: brackets to tables.
//!
//! - [`resolver`]: walks the brackets top-down and cascades downfloaters
//! - [`search`]: bounded matching inside one bracket
//! - [`rules`]: no-rematch, colour balance and float constraints
//! - [`colour`]: colour allocation per confirmed pair
//! - [`bye`]: pairing-bye candidates and withdrawal-byes
//! - [`assembler`]: table numbering and the response payload

pub mod assembler;
pub mod bye;
pub mod colour;
pub mod config;
pub mod resolver;
pub mod rules;
pub mod search;

pub use assembler::ResultAssembler;
pub use bye::{ByeAssigner, WithdrawalBye};
pub use colour::{ColourAllocator, ColourAssignment};
pub use config::{PairingConfig, PairingConfigError};
pub use resolver::{BracketState, PairingResolver, ResolvedRound};
pub use rules::{ConstraintLevel, PairingRule, Rule, RuleSet};
pub use search::{BracketMatch, BracketMatcher};
