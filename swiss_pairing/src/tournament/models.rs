//! Tournament data models shared with clients.
//!
//! These types are the persisted and transmitted representation of a tournament.
//! Points travel as decimal numbers; the pairing core converts them to
//! [`Score`](crate::Score) when it builds history.

use serde::{Deserialize, Serialize};

/// Player identifier (starting number)
pub type StartNo = u32;

/// A complete tournament snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    /// Configured total number of rounds
    pub all_rounds_no: u32,
    /// Registered players
    #[serde(default)]
    pub players: Vec<Player>,
    /// Completed (or in-progress) rounds in order
    #[serde(default)]
    pub rounds: Vec<Round>,
}

impl Tournament {
    /// Create an empty tournament with the given number of rounds
    pub fn new(all_rounds_no: u32) -> Self {
        Self {
            all_rounds_no,
            players: Vec::new(),
            rounds: Vec::new(),
        }
    }

    /// Number of rounds already paired
    pub fn rounds_played(&self) -> u32 {
        self.rounds.len() as u32
    }

    /// 1-based number of the round that would be paired next
    pub fn next_round_no(&self) -> u32 {
        self.rounds_played() + 1
    }

    /// Whether every configured round has been paired
    pub fn is_complete(&self) -> bool {
        self.rounds_played() >= self.all_rounds_no
    }

    /// Whether the next round is the final one
    pub fn is_last_round(&self) -> bool {
        self.next_round_no() == self.all_rounds_no
    }

    /// Look up a player by starting number
    pub fn player(&self, start_no: StartNo) -> Option<&Player> {
        self.players.iter().find(|p| p.start_no == start_no)
    }

    /// Mutable player lookup
    pub fn player_mut(&mut self, start_no: StartNo) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.start_no == start_no)
    }

    /// Register a player with the next free starting number
    pub fn add_player(&mut self, identity: impl Into<String>) -> StartNo {
        let start_no = self
            .players
            .iter()
            .map(|p| p.start_no)
            .max()
            .unwrap_or(0)
            + 1;
        self.players.push(Player::new(start_no, identity));
        start_no
    }

    /// Append a computed pairing as the next round, with every game in progress
    pub fn append_pairing(&mut self, pairing: Pairing) {
        self.rounds.push(Round::from(pairing));
    }
}

/// A registered player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub start_no: StartNo,
    #[serde(default)]
    pub identity: String,
    #[serde(default)]
    pub withdrawals: Vec<Withdrawal>,
}

impl Player {
    pub fn new(start_no: StartNo, identity: impl Into<String>) -> Self {
        Self {
            start_no,
            identity: identity.into(),
            withdrawals: Vec::new(),
        }
    }

    /// Withdrawal recorded for the given round, if any
    pub fn withdrawal_for(&self, round_no: u32) -> Option<&Withdrawal> {
        self.withdrawals.iter().find(|w| w.round_no == round_no)
    }
}

/// A player sitting out one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Withdrawal {
    /// 1-based round number
    pub round_no: u32,
    /// Points awarded for the missed round (absent means zero)
    #[serde(default)]
    pub bye: Option<f64>,
}

/// One round of the tournament
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Round {
    #[serde(default)]
    pub games: Vec<Game>,
    #[serde(default)]
    pub byes: Vec<EmptyTable>,
}

impl Round {
    /// Find the game played at a table
    pub fn game_mut(&mut self, table_no: u32) -> Option<&mut Game> {
        self.games.iter_mut().find(|g| g.table.table_no == table_no)
    }
}

impl From<Pairing> for Round {
    fn from(pairing: Pairing) -> Self {
        Self {
            games: pairing.tables.into_iter().map(Game::in_progress).collect(),
            byes: pairing.empty_tables,
        }
    }
}

/// A game between two players
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub table: Table,
    /// `None` while the game is in progress
    #[serde(default)]
    pub white_result: Option<GameResult>,
    #[serde(default)]
    pub black_result: Option<GameResult>,
}

impl Game {
    pub fn in_progress(table: Table) -> Self {
        Self {
            table,
            white_result: None,
            black_result: None,
        }
    }

    /// Record the final result of the game
    pub fn record(&mut self, white_points: f64, black_points: f64) {
        self.white_result = Some(GameResult {
            points: white_points,
        });
        self.black_result = Some(GameResult {
            points: black_points,
        });
    }

    pub fn is_finished(&self) -> bool {
        self.white_result.is_some() && self.black_result.is_some()
    }
}

/// Points scored by one side of a game
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub points: f64,
}

/// A board assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub table_no: u32,
    pub white: StartNo,
    pub black: StartNo,
}

/// A player without an opponent in a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmptyTable {
    pub table_no: u32,
    pub start_no: StartNo,
    pub bye: Bye,
}

/// Points awarded for a round without an opponent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bye {
    pub points: f64,
    pub kind: ByeKind,
}

/// Why a player has no opponent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByeKind {
    /// The player withdrew from the round
    Withdrawal,
    /// Odd number of active players
    Pairing,
}

/// The pairing of one round
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pairing {
    pub tables: Vec<Table>,
    pub empty_tables: Vec<EmptyTable>,
}

/// `CalculatePairing` request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatePairingRequest {
    pub tournament: Tournament,
}

/// `CalculatePairing` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatePairingResponse {
    pub pairing: Pairing,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_player_assigns_next_start_no() {
        let mut tournament = Tournament::new(5);
        assert_eq!(tournament.add_player("Alice"), 1);
        assert_eq!(tournament.add_player("Bob"), 2);
        assert_eq!(tournament.player(2).map(|p| p.identity.as_str()), Some("Bob"));
    }

    #[test]
    fn test_round_counters() {
        let mut tournament = Tournament::new(2);
        assert_eq!(tournament.next_round_no(), 1);
        assert!(!tournament.is_last_round());

        tournament.append_pairing(Pairing::default());
        assert_eq!(tournament.next_round_no(), 2);
        assert!(tournament.is_last_round());
        assert!(!tournament.is_complete());

        tournament.append_pairing(Pairing::default());
        assert!(tournament.is_complete());
    }

    #[test]
    fn test_append_pairing_leaves_games_in_progress() {
        let mut tournament = Tournament::new(3);
        tournament.append_pairing(Pairing {
            tables: vec![Table {
                table_no: 1,
                white: 1,
                black: 2,
            }],
            empty_tables: vec![EmptyTable {
                table_no: 2,
                start_no: 3,
                bye: Bye {
                    points: 1.0,
                    kind: ByeKind::Pairing,
                },
            }],
        });

        let round = &tournament.rounds[0];
        assert_eq!(round.games.len(), 1);
        assert!(!round.games[0].is_finished());
        assert_eq!(round.byes[0].start_no, 3);
    }

    #[test]
    fn test_deserialize_minimal_tournament() {
        let json = r#"{
            "all_rounds_no": 3,
            "players": [{"start_no": 1}, {"start_no": 2, "withdrawals": [{"round_no": 1}]}]
        }"#;
        let tournament: Tournament = serde_json::from_str(json).unwrap();
        assert_eq!(tournament.players.len(), 2);
        assert!(tournament.rounds.is_empty());
        assert_eq!(tournament.players[1].withdrawal_for(1).and_then(|w| w.bye), None);
    }

    #[test]
    fn test_bye_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ByeKind::Withdrawal).unwrap();
        assert_eq!(json, "\"withdrawal\"");
    }
}
