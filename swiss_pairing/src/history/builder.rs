//! Builds player cards from recorded rounds.

use log::{debug, trace};
use std::collections::{BTreeMap, BTreeSet};

use super::cards::{Colour, Float, PlayerCard, RoundCard};
use crate::{
    errors::{PairingError, PairingResult},
    score::Score,
    tournament::{GameResult, Round, StartNo, Tournament},
};

/// Player cards for every registered player, keyed by starting number
#[derive(Clone, Debug, Default)]
pub struct History {
    cards: BTreeMap<StartNo, PlayerCard>,
    rounds_played: u32,
}

impl History {
    pub fn card(&self, start_no: StartNo) -> Option<&PlayerCard> {
        self.cards.get(&start_no)
    }

    /// Cards in starting-number order
    pub fn cards(&self) -> impl Iterator<Item = &PlayerCard> {
        self.cards.values()
    }

    pub fn score(&self, start_no: StartNo) -> Score {
        self.card(start_no).map_or(Score::ZERO, PlayerCard::score)
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Replays the recorded rounds of a tournament into [`History`].
pub struct HistoryBuilder;

impl HistoryBuilder {
    /// Replay every round in order.
    ///
    /// Results still missing are counted as draws. The cards only feed pairing
    /// decisions, the tournament itself is never touched.
    ///
    /// # Errors
    ///
    /// - `InvalidResult` if a game result is not 0, 0.5 or 1, or a bye is not a
    ///   non-negative multiple of 0.5
    /// - `DuplicatePlacement` if a player appears twice in one round (round 0
    ///   means the player list itself holds a duplicate)
    /// - `UnknownPlayer` / `SelfPairing` for games naming bad players
    pub fn build(tournament: &Tournament) -> PairingResult<History> {
        let mut cards = BTreeMap::new();
        for player in &tournament.players {
            if cards
                .insert(player.start_no, PlayerCard::new(player.start_no))
                .is_some()
            {
                return Err(PairingError::DuplicatePlacement {
                    round_no: 0,
                    start_no: player.start_no,
                });
            }
        }

        let mut history = History {
            cards,
            rounds_played: 0,
        };
        for (index, round) in tournament.rounds.iter().enumerate() {
            let round_no = index as u32 + 1;
            Self::replay_round(&mut history, round_no, round)?;
            history.rounds_played = round_no;
        }

        debug!(
            "Built history for {} players over {} rounds",
            history.len(),
            history.rounds_played
        );
        Ok(history)
    }

    fn replay_round(history: &mut History, round_no: u32, round: &Round) -> PairingResult<()> {
        // Floats compare scores from before this round, so snapshot them first.
        let prior: BTreeMap<StartNo, Score> = history
            .cards
            .iter()
            .map(|(start_no, card)| (*start_no, card.score()))
            .collect();
        let mut placed = BTreeSet::new();

        for game in &round.games {
            let white = game.table.white;
            let black = game.table.black;
            if white == black {
                return Err(PairingError::SelfPairing {
                    round_no,
                    start_no: white,
                });
            }
            for start_no in [white, black] {
                Self::place(history, &mut placed, round_no, start_no)?;
            }

            let white_points = Self::game_points(game.white_result, round_no, white)?;
            let black_points = Self::game_points(game.black_result, round_no, black)?;
            // A finished game hands out exactly one point between both sides.
            if let (Some(result), Some(_)) = (game.white_result, game.black_result) {
                if white_points + black_points != Score::ONE {
                    return Err(PairingError::InvalidResult {
                        round_no,
                        start_no: white,
                        points: result.points,
                    });
                }
            }
            let white_prior = prior.get(&white).copied().unwrap_or_default();
            let black_prior = prior.get(&black).copied().unwrap_or_default();

            Self::append(
                history,
                white,
                RoundCard {
                    opponent: Some(black),
                    round_no,
                    colour: Colour::White,
                    result: white_points,
                    float: Float::between(white_prior, black_prior),
                    cumulative: white_prior + white_points,
                    bye: None,
                },
            );
            Self::append(
                history,
                black,
                RoundCard {
                    opponent: Some(white),
                    round_no,
                    colour: Colour::Black,
                    result: black_points,
                    float: Float::between(black_prior, white_prior),
                    cumulative: black_prior + black_points,
                    bye: None,
                },
            );
        }

        for empty in &round.byes {
            let start_no = empty.start_no;
            Self::place(history, &mut placed, round_no, start_no)?;
            let points = Score::from_points(empty.bye.points).ok_or(PairingError::InvalidResult {
                round_no,
                start_no,
                points: empty.bye.points,
            })?;
            let before = prior.get(&start_no).copied().unwrap_or_default();
            Self::append(
                history,
                start_no,
                RoundCard {
                    opponent: None,
                    round_no,
                    colour: Colour::None,
                    result: points,
                    float: if points.is_zero() {
                        Float::None
                    } else {
                        Float::Down
                    },
                    cumulative: before + points,
                    bye: Some(empty.bye.kind),
                },
            );
        }

        let idle: Vec<StartNo> = history
            .cards
            .keys()
            .filter(|start_no| !placed.contains(*start_no))
            .copied()
            .collect();
        for start_no in idle {
            trace!("Player {start_no} idle in round {round_no}");
            let before = prior.get(&start_no).copied().unwrap_or_default();
            Self::append(
                history,
                start_no,
                RoundCard {
                    opponent: None,
                    round_no,
                    colour: Colour::None,
                    result: Score::ZERO,
                    float: Float::None,
                    cumulative: before,
                    bye: None,
                },
            );
        }

        Ok(())
    }

    fn place(
        history: &History,
        placed: &mut BTreeSet<StartNo>,
        round_no: u32,
        start_no: StartNo,
    ) -> PairingResult<()> {
        if !history.cards.contains_key(&start_no) {
            return Err(PairingError::UnknownPlayer { round_no, start_no });
        }
        if !placed.insert(start_no) {
            return Err(PairingError::DuplicatePlacement { round_no, start_no });
        }
        Ok(())
    }

    fn game_points(
        result: Option<GameResult>,
        round_no: u32,
        start_no: StartNo,
    ) -> PairingResult<Score> {
        match result {
            // In-progress games count as a draw for pairing purposes only.
            None => Ok(Score::HALF),
            Some(result) => {
                Score::from_game_points(result.points).ok_or(PairingError::InvalidResult {
                    round_no,
                    start_no,
                    points: result.points,
                })
            }
        }
    }

    fn append(history: &mut History, start_no: StartNo, card: RoundCard) {
        if let Some(player) = history.cards.get_mut(&start_no) {
            player.push(card);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::{Bye, ByeKind, EmptyTable, Game, Player, Table};

    fn tournament(players: u32) -> Tournament {
        Tournament {
            all_rounds_no: 5,
            players: (1..=players).map(|n| Player::new(n, format!("P{n}"))).collect(),
            rounds: Vec::new(),
        }
    }

    fn game(table_no: u32, white: StartNo, black: StartNo, w: f64, b: f64) -> Game {
        let mut game = Game::in_progress(Table {
            table_no,
            white,
            black,
        });
        game.record(w, b);
        game
    }

    #[test]
    fn test_history_records_scores_and_colours() {
        let mut t = tournament(4);
        t.rounds.push(Round {
            games: vec![game(1, 1, 3, 1.0, 0.0), game(2, 2, 4, 0.5, 0.5)],
            byes: vec![],
        });
        t.rounds.push(Round {
            games: vec![game(1, 2, 1, 0.0, 1.0), game(2, 4, 3, 1.0, 0.0)],
            byes: vec![],
        });

        let history = HistoryBuilder::build(&t).unwrap();
        assert_eq!(history.rounds_played(), 2);
        assert_eq!(history.score(1), Score::from_half_points(4));
        assert_eq!(history.score(2), Score::HALF);
        assert_eq!(history.score(3), Score::ZERO);
        assert_eq!(history.score(4), Score::from_half_points(3));

        let card = history.card(1).unwrap();
        assert_eq!(card.rounds.len(), 2);
        assert_eq!(card.colour_difference, 0);
        assert_eq!(card.last_colour, Colour::Black);
        // 1 had 1 point, 2 had 0.5 before round 2
        assert_eq!(card.rounds[1].float, Float::Down);
        assert_eq!(history.card(2).unwrap().rounds[1].float, Float::Up);
    }

    #[test]
    fn test_missing_result_counts_as_draw() {
        let mut t = tournament(2);
        t.rounds.push(Round {
            games: vec![Game::in_progress(Table {
                table_no: 1,
                white: 1,
                black: 2,
            })],
            byes: vec![],
        });

        let history = HistoryBuilder::build(&t).unwrap();
        assert_eq!(history.score(1), Score::HALF);
        assert_eq!(history.score(2), Score::HALF);
    }

    #[test]
    fn test_bye_and_idle_rounds() {
        let mut t = tournament(4);
        t.rounds.push(Round {
            games: vec![game(1, 1, 2, 1.0, 0.0)],
            byes: vec![EmptyTable {
                table_no: 2,
                start_no: 3,
                bye: Bye {
                    points: 1.0,
                    kind: ByeKind::Pairing,
                },
            }],
        });

        let history = HistoryBuilder::build(&t).unwrap();
        let bye = &history.card(3).unwrap().rounds[0];
        assert_eq!(bye.opponent, None);
        assert_eq!(bye.float, Float::Down);
        assert_eq!(bye.bye, Some(ByeKind::Pairing));

        let idle = &history.card(4).unwrap().rounds[0];
        assert_eq!(idle.result, Score::ZERO);
        assert_eq!(idle.float, Float::None);
        assert_eq!(history.card(4).unwrap().rounds.len(), 1);
    }

    #[test]
    fn test_invalid_result_rejected() {
        let mut t = tournament(2);
        t.rounds.push(Round {
            games: vec![game(1, 1, 2, 0.3, 0.7)],
            byes: vec![],
        });

        let err = HistoryBuilder::build(&t).unwrap_err();
        assert_eq!(
            err,
            PairingError::InvalidResult {
                round_no: 1,
                start_no: 1,
                points: 0.3
            }
        );
    }

    #[test]
    fn test_result_must_total_one_point() {
        let mut t = tournament(4);
        t.rounds.push(Round {
            games: vec![game(1, 1, 3, 1.0, 1.0), game(2, 2, 4, 0.0, 0.0)],
            byes: vec![],
        });
        assert_eq!(
            HistoryBuilder::build(&t).unwrap_err(),
            PairingError::InvalidResult {
                round_no: 1,
                start_no: 1,
                points: 1.0
            }
        );

        t.rounds[0].games.remove(0);
        assert!(matches!(
            HistoryBuilder::build(&t),
            Err(PairingError::InvalidResult { start_no: 2, .. })
        ));
    }

    #[test]
    fn test_duplicate_placement_rejected() {
        let mut t = tournament(3);
        t.rounds.push(Round {
            games: vec![game(1, 1, 2, 1.0, 0.0), game(2, 3, 1, 1.0, 0.0)],
            byes: vec![],
        });

        let err = HistoryBuilder::build(&t).unwrap_err();
        assert!(matches!(
            err,
            PairingError::DuplicatePlacement {
                round_no: 1,
                start_no: 1
            }
        ));
    }

    #[test]
    fn test_unknown_and_self_pairing_rejected() {
        let mut t = tournament(2);
        t.rounds.push(Round {
            games: vec![game(1, 1, 9, 1.0, 0.0)],
            byes: vec![],
        });
        assert!(matches!(
            HistoryBuilder::build(&t),
            Err(PairingError::UnknownPlayer { start_no: 9, .. })
        ));

        t.rounds[0].games[0].table.black = 1;
        assert!(matches!(
            HistoryBuilder::build(&t),
            Err(PairingError::SelfPairing { start_no: 1, .. })
        ));
    }
}
