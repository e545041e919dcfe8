//! The `CalculatePairing` operation.

use log::{debug, info};
use std::collections::BTreeMap;

use crate::{
    brackets::BracketBuilder,
    cancel::CancelFlag,
    errors::{PairingError, PairingResult},
    history::{History, HistoryBuilder, PlayerCard},
    pairing::{ByeAssigner, PairingConfig, PairingResolver, ResultAssembler, WithdrawalBye},
    score::Score,
    tournament::{CalculatePairingRequest, CalculatePairingResponse, StartNo, Tournament},
};

/// Computes the next round of a tournament.
///
/// The engine only holds configuration; every call works from its own
/// tournament snapshot, so one engine can serve concurrent requests.
#[derive(Clone, Debug, Default)]
pub struct PairingEngine {
    config: PairingConfig,
}

impl PairingEngine {
    pub fn new(config: PairingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PairingConfig {
        &self.config
    }

    /// Pair the next round of `request.tournament`.
    ///
    /// # Errors
    ///
    /// - `AllRoundsPaired` if every configured round is already paired
    /// - `InvalidResult`, `DuplicatePlacement`, `UnknownPlayer`, `SelfPairing` for
    ///   corrupted history
    /// - `UnsolvableBracket` if no legal placement exists
    pub fn calculate_pairing(
        &self,
        request: &CalculatePairingRequest,
    ) -> PairingResult<CalculatePairingResponse> {
        self.calculate_pairing_with_cancel(request, &CancelFlag::new())
    }

    /// Same as [`calculate_pairing`](Self::calculate_pairing), aborting with
    /// `Cancelled` once `cancel` is raised.
    pub fn calculate_pairing_with_cancel(
        &self,
        request: &CalculatePairingRequest,
        cancel: &CancelFlag,
    ) -> PairingResult<CalculatePairingResponse> {
        let tournament = &request.tournament;
        if tournament.is_complete() {
            return Err(PairingError::AllRoundsPaired {
                played: tournament.rounds_played(),
                configured: tournament.all_rounds_no,
            });
        }
        if cancel.is_cancelled() {
            return Err(PairingError::Cancelled);
        }

        let round_no = tournament.next_round_no();
        let apply_last = tournament.is_last_round();
        let history = HistoryBuilder::build(tournament)?;
        let (eligible, withdrawals) = split_withdrawn(tournament, &history, round_no)?;
        debug!(
            "Round {round_no}: {} eligible, {} withdrawn, last round: {apply_last}",
            eligible.len(),
            withdrawals.len()
        );

        let brackets = BracketBuilder::build(eligible);
        let resolved =
            PairingResolver::new(&self.config, round_no, apply_last, cancel).resolve(brackets)?;
        let pairing = ResultAssembler::new(round_no).assemble(
            &resolved,
            &withdrawals,
            &ByeAssigner::new(&self.config),
        );

        info!(
            "Paired round {round_no} of {}: {} tables, {} byes ({:?} rules)",
            tournament.all_rounds_no,
            pairing.tables.len(),
            pairing.empty_tables.len(),
            resolved.level
        );
        Ok(CalculatePairingResponse { pairing })
    }
}

/// Separate players withdrawn from `round_no` from those to be paired
fn split_withdrawn<'h>(
    tournament: &Tournament,
    history: &'h History,
    round_no: u32,
) -> PairingResult<(Vec<&'h PlayerCard>, Vec<WithdrawalBye>)> {
    let withdrawn: BTreeMap<StartNo, Option<f64>> = tournament
        .players
        .iter()
        .filter_map(|player| {
            player
                .withdrawal_for(round_no)
                .map(|withdrawal| (player.start_no, withdrawal.bye))
        })
        .collect();

    let mut eligible = Vec::new();
    let mut withdrawals = Vec::new();
    for card in history.cards() {
        match withdrawn.get(&card.start_no) {
            None => eligible.push(card),
            Some(bye) => {
                let points = match *bye {
                    None => Score::ZERO,
                    Some(points) => Score::from_points(points).ok_or(
                        PairingError::InvalidResult {
                            round_no,
                            start_no: card.start_no,
                            points,
                        },
                    )?,
                };
                withdrawals.push(WithdrawalBye {
                    start_no: card.start_no,
                    points,
                });
            }
        }
    }
    Ok((eligible, withdrawals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::{Player, Withdrawal};

    fn request(players: u32, all_rounds_no: u32) -> CalculatePairingRequest {
        CalculatePairingRequest {
            tournament: Tournament {
                all_rounds_no,
                players: (1..=players).map(|n| Player::new(n, format!("P{n}"))).collect(),
                rounds: Vec::new(),
            },
        }
    }

    #[test]
    fn test_quota_checked_first() {
        let engine = PairingEngine::default();
        let err = engine.calculate_pairing(&request(4, 0)).unwrap_err();
        assert_eq!(
            err,
            PairingError::AllRoundsPaired {
                played: 0,
                configured: 0
            }
        );
    }

    #[test]
    fn test_cancelled_before_start() {
        let engine = PairingEngine::default();
        let cancel = CancelFlag::new();
        cancel.cancel();
        let err = engine
            .calculate_pairing_with_cancel(&request(4, 3), &cancel)
            .unwrap_err();
        assert_eq!(err, PairingError::Cancelled);
    }

    #[test]
    fn test_invalid_withdrawal_bye_rejected() {
        let mut req = request(4, 3);
        req.tournament.players[1].withdrawals.push(Withdrawal {
            round_no: 1,
            bye: Some(0.25),
        });
        let err = PairingEngine::default().calculate_pairing(&req).unwrap_err();
        assert!(matches!(
            err,
            PairingError::InvalidResult {
                round_no: 1,
                start_no: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_withdrawal_for_other_round_ignored() {
        let mut req = request(2, 3);
        req.tournament.players[0].withdrawals.push(Withdrawal {
            round_no: 2,
            bye: None,
        });
        let response = PairingEngine::default().calculate_pairing(&req).unwrap();
        assert_eq!(response.pairing.tables.len(), 1);
        assert!(response.pairing.empty_tables.is_empty());
    }
}
