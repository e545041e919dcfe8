//! Bounded matching search inside one bracket.
//!
//! The bracket's players arrive in rank order. The search first tries the
//! positional S1/S2 matching and its transpositions (permutations of S2 in
//! lexicographic order, so the smallest exchanges come first). If no complete
//! S1/S2 matching exists it falls back to a search over the whole bracket that
//! maximises the number of pairs. Players left without a partner are returned as
//! downfloaters. Each phase gets its own node budget.

use log::trace;

use super::rules::RuleSet;
use crate::{
    cancel::CancelFlag,
    errors::{PairingError, PairingResult},
    history::{Float, PlayerCard},
};

/// A pair in rank order: `(higher, lower)`
pub type Pair<'h> = (&'h PlayerCard, &'h PlayerCard);

/// Outcome of matching one bracket
#[derive(Clone, Debug, Default)]
pub struct BracketMatch<'h> {
    pub pairs: Vec<Pair<'h>>,
    /// Players to downfloat, in rank order
    pub unmatched: Vec<&'h PlayerCard>,
}

impl BracketMatch<'_> {
    pub fn is_complete(&self) -> bool {
        self.unmatched.is_empty()
    }
}

struct Budget<'a> {
    remaining: usize,
    cancel: &'a CancelFlag,
}

impl<'a> Budget<'a> {
    fn new(remaining: usize, cancel: &'a CancelFlag) -> Self {
        Self { remaining, cancel }
    }

    /// Spend one attempt. `Ok(false)` once the budget is gone.
    fn tick(&mut self) -> PairingResult<bool> {
        if self.cancel.is_cancelled() {
            return Err(PairingError::Cancelled);
        }
        if self.remaining == 0 {
            return Ok(false);
        }
        self.remaining -= 1;
        Ok(true)
    }

    fn exhausted(&self) -> bool {
        self.remaining == 0
    }
}

#[derive(Default)]
struct MaxState {
    taken: Vec<bool>,
    current: Vec<(usize, usize)>,
    best: Vec<(usize, usize)>,
}

/// Matches the players of a single bracket under one rule set
pub struct BracketMatcher<'a> {
    rules: &'a RuleSet,
    max_attempts: usize,
    cancel: &'a CancelFlag,
}

impl<'a> BracketMatcher<'a> {
    pub fn new(rules: &'a RuleSet, max_attempts: usize, cancel: &'a CancelFlag) -> Self {
        Self {
            rules,
            max_attempts,
            cancel,
        }
    }

    /// Match `players` (rank order) as completely as the budget allows.
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` if the cancel flag is raised during the search.
    pub fn resolve<'h>(&self, players: &[&'h PlayerCard]) -> PairingResult<BracketMatch<'h>> {
        let mut budget = Budget::new(self.max_attempts, self.cancel);

        if players.len() % 2 == 0 {
            if let Some(pairs) = self.transpose(players, &mut budget)? {
                return Ok(BracketMatch {
                    pairs,
                    unmatched: Vec::new(),
                });
            }
        } else {
            for holdout in self.holdout_order(players) {
                let rest: Vec<&'h PlayerCard> = players
                    .iter()
                    .copied()
                    .filter(|card| card.start_no != holdout.start_no)
                    .collect();
                if let Some(pairs) = self.transpose(&rest, &mut budget)? {
                    return Ok(BracketMatch {
                        pairs,
                        unmatched: vec![holdout],
                    });
                }
                if budget.exhausted() {
                    break;
                }
            }
        }

        trace!(
            "No S1/S2 matching for {} players, searching whole bracket",
            players.len()
        );
        let mut budget = Budget::new(self.max_attempts, self.cancel);
        self.maximise(players, &mut budget)
    }

    /// Holdout candidates for an odd bracket, lowest-ranked first. While float
    /// rules apply, players who floated down last round go last.
    fn holdout_order<'h>(&self, players: &[&'h PlayerCard]) -> Vec<&'h PlayerCard> {
        let mut order: Vec<&'h PlayerCard> = players.iter().rev().copied().collect();
        if self.rules.level().checks_floats() {
            order.sort_by_key(|card| card.last_float() == Float::Down);
        }
        order
    }

    fn transpose<'h>(
        &self,
        players: &[&'h PlayerCard],
        budget: &mut Budget<'_>,
    ) -> PairingResult<Option<Vec<Pair<'h>>>> {
        let (s1, s2) = players.split_at(players.len() / 2);
        let mut used = vec![false; s2.len()];
        let mut chosen = Vec::with_capacity(s1.len());

        if self.assign(s1, s2, &mut used, &mut chosen, budget)? {
            Ok(Some(
                chosen
                    .iter()
                    .enumerate()
                    .map(|(i, &j)| (s1[i], s2[j]))
                    .collect(),
            ))
        } else {
            Ok(None)
        }
    }

    fn assign(
        &self,
        s1: &[&PlayerCard],
        s2: &[&PlayerCard],
        used: &mut [bool],
        chosen: &mut Vec<usize>,
        budget: &mut Budget<'_>,
    ) -> PairingResult<bool> {
        let i = chosen.len();
        if i == s1.len() {
            return Ok(true);
        }

        for j in 0..s2.len() {
            if used[j] {
                continue;
            }
            if !budget.tick()? {
                return Ok(false);
            }
            if !self.rules.permits(s1[i], s2[j]) {
                continue;
            }
            used[j] = true;
            chosen.push(j);
            if self.assign(s1, s2, used, chosen, budget)? {
                return Ok(true);
            }
            chosen.pop();
            used[j] = false;
        }
        Ok(false)
    }

    fn maximise<'h>(
        &self,
        players: &[&'h PlayerCard],
        budget: &mut Budget<'_>,
    ) -> PairingResult<BracketMatch<'h>> {
        let mut state = MaxState {
            taken: vec![false; players.len()],
            ..MaxState::default()
        };
        self.extend(players, 0, &mut state, budget)?;

        let mut paired = vec![false; players.len()];
        let pairs = state
            .best
            .iter()
            .map(|&(u, v)| {
                paired[u] = true;
                paired[v] = true;
                (players[u], players[v])
            })
            .collect();
        let unmatched = players
            .iter()
            .zip(paired)
            .filter(|(_, paired)| !paired)
            .map(|(card, _)| *card)
            .collect();

        Ok(BracketMatch { pairs, unmatched })
    }

    fn extend(
        &self,
        players: &[&PlayerCard],
        from: usize,
        state: &mut MaxState,
        budget: &mut Budget<'_>,
    ) -> PairingResult<()> {
        if state.current.len() > state.best.len() {
            state.best = state.current.clone();
        }
        let perfect = players.len() / 2;
        if state.best.len() == perfect || budget.exhausted() {
            return Ok(());
        }

        let Some(u) = (from..players.len()).find(|&i| !state.taken[i]) else {
            return Ok(());
        };
        let others: Vec<usize> = (u + 1..players.len())
            .filter(|&i| !state.taken[i])
            .collect();
        // Pairs still reachable from here cannot beat the best found so far.
        if state.current.len() + (others.len() + 1) / 2 <= state.best.len() {
            return Ok(());
        }

        state.taken[u] = true;
        let middle = others.len() / 2;
        let candidates = others[middle..]
            .iter()
            .chain(others[..middle].iter().rev());
        for &v in candidates {
            if !budget.tick()? {
                break;
            }
            if !self.rules.permits(players[u], players[v]) {
                continue;
            }
            state.taken[v] = true;
            state.current.push((u, v));
            self.extend(players, u + 1, state, budget)?;
            state.current.pop();
            state.taken[v] = false;
            if state.best.len() == perfect {
                break;
            }
        }

        // Leave `u` without a partner.
        if state.best.len() < perfect {
            self.extend(players, u + 1, state, budget)?;
        }
        state.taken[u] = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        history::{Colour, RoundCard},
        pairing::{
            colour::ColourAllocator,
            rules::{ConstraintLevel, RuleContext},
        },
        score::Score,
        tournament::StartNo,
    };

    fn rules(level: ConstraintLevel) -> RuleSet {
        RuleSet::new(
            level,
            RuleContext {
                colours: ColourAllocator::new(1),
                max_colour_difference: 2,
            },
        )
    }

    fn fresh(start_no: StartNo) -> PlayerCard {
        PlayerCard::new(start_no)
    }

    fn met(start_no: StartNo, opponents: &[StartNo]) -> PlayerCard {
        let mut card = PlayerCard::new(start_no);
        for (index, opponent) in opponents.iter().enumerate() {
            card.push(RoundCard {
                opponent: Some(*opponent),
                round_no: index as u32 + 1,
                colour: Colour::None,
                result: Score::ZERO,
                float: Float::None,
                cumulative: Score::ZERO,
                bye: None,
            });
        }
        card
    }

    fn ids(pairs: &[Pair<'_>]) -> Vec<(StartNo, StartNo)> {
        pairs.iter().map(|(a, b)| (a.start_no, b.start_no)).collect()
    }

    #[test]
    fn test_positional_matching() {
        let cards: Vec<PlayerCard> = (1..=4).map(fresh).collect();
        let players: Vec<&PlayerCard> = cards.iter().collect();
        let rules = rules(ConstraintLevel::Strict);
        let cancel = CancelFlag::new();

        let result = BracketMatcher::new(&rules, 100, &cancel)
            .resolve(&players)
            .unwrap();
        assert!(result.is_complete());
        assert_eq!(ids(&result.pairs), vec![(1, 3), (2, 4)]);
    }

    #[test]
    fn test_transposition_avoids_rematch() {
        let cards = vec![met(1, &[3]), met(2, &[4]), met(3, &[1]), met(4, &[2])];
        let players: Vec<&PlayerCard> = cards.iter().collect();
        let rules = rules(ConstraintLevel::Relaxed);
        let cancel = CancelFlag::new();

        let result = BracketMatcher::new(&rules, 100, &cancel)
            .resolve(&players)
            .unwrap();
        assert_eq!(ids(&result.pairs), vec![(1, 4), (2, 3)]);
    }

    #[test]
    fn test_odd_bracket_holds_out_lowest() {
        let cards: Vec<PlayerCard> = (1..=5).map(fresh).collect();
        let players: Vec<&PlayerCard> = cards.iter().collect();
        let rules = rules(ConstraintLevel::Relaxed);
        let cancel = CancelFlag::new();

        let result = BracketMatcher::new(&rules, 100, &cancel)
            .resolve(&players)
            .unwrap();
        assert_eq!(ids(&result.pairs), vec![(1, 3), (2, 4)]);
        assert_eq!(result.unmatched.len(), 1);
        assert_eq!(result.unmatched[0].start_no, 5);
    }

    #[test]
    fn test_unmatchable_players_downfloat() {
        // 1 has met everybody else in the bracket
        let cards = vec![met(1, &[2, 3, 4]), met(2, &[1]), met(3, &[1]), met(4, &[1])];
        let players: Vec<&PlayerCard> = cards.iter().collect();
        let rules = rules(ConstraintLevel::Relaxed);
        let cancel = CancelFlag::new();

        let result = BracketMatcher::new(&rules, 1_000, &cancel)
            .resolve(&players)
            .unwrap();
        assert_eq!(result.pairs.len(), 1);
        let unmatched: Vec<StartNo> = result.unmatched.iter().map(|c| c.start_no).collect();
        assert!(unmatched.contains(&1));
        assert_eq!(unmatched.len(), 2);
    }

    #[test]
    fn test_cancel_aborts_search() {
        let cards: Vec<PlayerCard> = (1..=4).map(fresh).collect();
        let players: Vec<&PlayerCard> = cards.iter().collect();
        let rules = rules(ConstraintLevel::Strict);
        let cancel = CancelFlag::new();
        cancel.cancel();

        let err = BracketMatcher::new(&rules, 100, &cancel)
            .resolve(&players)
            .unwrap_err();
        assert_eq!(err, PairingError::Cancelled);
    }
}
