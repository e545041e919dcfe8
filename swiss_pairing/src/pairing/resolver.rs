//! Bracket-by-bracket resolution of a round.
//!
//! Brackets are processed strictly top-down. Each bracket moves through
//! `Pending → Resolving → Resolved`; whatever a bracket cannot pair is carried
//! into the next one as downfloaters. When the last bracket cannot be completed
//! the resolver relaxes the rule set, then collapses the lowest brackets into one,
//! and for an odd pool tries the next pairing-bye candidate.

use log::{debug, info, trace, warn};

use super::{
    bye::ByeAssigner,
    colour::ColourAllocator,
    config::PairingConfig,
    rules::{ConstraintLevel, RuleContext, RuleSet},
    search::{BracketMatcher, Pair},
};
use crate::{
    brackets::Bracket,
    cancel::CancelFlag,
    errors::{PairingError, PairingResult},
    history::PlayerCard,
    score::Score,
};

/// Lifecycle of one bracket within a cascade
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BracketState {
    Pending,
    Resolving,
    Resolved,
}

struct BracketSlot<'h> {
    bracket: Bracket<'h>,
    state: BracketState,
}

impl BracketSlot<'_> {
    fn advance(&mut self, next: BracketState) {
        trace!(
            "Bracket {} ({} players): {:?} -> {:?}",
            self.bracket.score(),
            self.bracket.len(),
            self.state,
            next
        );
        self.state = next;
    }
}

/// Every active player placed: pairs in table order plus the pairing-bye
#[derive(Clone, Debug)]
pub struct ResolvedRound<'h> {
    pub pairs: Vec<Pair<'h>>,
    pub bye: Option<&'h PlayerCard>,
    pub level: ConstraintLevel,
}

/// Resolves the brackets of one round
pub struct PairingResolver<'a> {
    config: &'a PairingConfig,
    round_no: u32,
    apply_last: bool,
    cancel: &'a CancelFlag,
}

impl<'a> PairingResolver<'a> {
    pub fn new(
        config: &'a PairingConfig,
        round_no: u32,
        apply_last: bool,
        cancel: &'a CancelFlag,
    ) -> Self {
        Self {
            config,
            round_no,
            apply_last,
            cancel,
        }
    }

    /// Place every player of `brackets` at a table or on the pairing-bye.
    ///
    /// # Errors
    ///
    /// - `UnsolvableBracket` if no legal placement exists
    /// - `Cancelled` if the cancel flag is raised
    pub fn resolve<'h>(&self, brackets: Vec<Bracket<'h>>) -> PairingResult<ResolvedRound<'h>> {
        let total: usize = brackets.iter().map(Bracket::len).sum();
        let lowest_score = brackets.last().map_or(Score::ZERO, Bracket::score);

        if total % 2 == 0 {
            if let Some((pairs, level)) = self.resolve_pool(&brackets)? {
                return Ok(ResolvedRound {
                    pairs,
                    bye: None,
                    level,
                });
            }
        } else {
            let pool: Vec<&'h PlayerCard> = brackets.iter().flat_map(Bracket::players).collect();
            for candidate in ByeAssigner::new(self.config).candidates(&pool) {
                let remaining = without(&brackets, candidate);
                if let Some((pairs, level)) = self.resolve_pool(&remaining)? {
                    info!(
                        "Round {}: pairing-bye to player {}",
                        self.round_no, candidate.start_no
                    );
                    return Ok(ResolvedRound {
                        pairs,
                        bye: Some(candidate),
                        level,
                    });
                }
                debug!(
                    "Round {}: bye to player {} leaves the pool unsolvable",
                    self.round_no, candidate.start_no
                );
            }
        }

        Err(PairingError::UnsolvableBracket {
            round_no: self.round_no,
            score: lowest_score,
        })
    }

    fn resolve_pool<'h>(
        &self,
        brackets: &[Bracket<'h>],
    ) -> PairingResult<Option<(Vec<Pair<'h>>, ConstraintLevel)>> {
        let ctx = RuleContext {
            colours: ColourAllocator::new(self.round_no),
            max_colour_difference: self.config.max_colour_difference,
        };

        for &level in ConstraintLevel::sequence(self.apply_last) {
            let rules = RuleSet::new(level, ctx);
            for collapse in 0..brackets.len().max(1) {
                if let Some(pairs) = self.cascade(collapse_lowest(brackets, collapse), &rules)? {
                    if collapse > 0 {
                        warn!(
                            "Round {}: collapsed the lowest {} brackets to complete the pairing",
                            self.round_no,
                            collapse + 1
                        );
                    }
                    if level != ConstraintLevel::sequence(self.apply_last)[0] {
                        warn!(
                            "Round {}: colour and float rules relaxed to complete the pairing",
                            self.round_no
                        );
                    }
                    return Ok(Some((pairs, level)));
                }
            }
        }
        Ok(None)
    }

    /// One top-down pass. `None` if players are left over after the last bracket.
    fn cascade<'h>(
        &self,
        brackets: Vec<Bracket<'h>>,
        rules: &RuleSet,
    ) -> PairingResult<Option<Vec<Pair<'h>>>> {
        let mut slots: Vec<BracketSlot<'h>> = brackets
            .into_iter()
            .map(|bracket| BracketSlot {
                bracket,
                state: BracketState::Pending,
            })
            .collect();
        let matcher = BracketMatcher::new(rules, self.config.max_search_attempts, self.cancel);
        let mut pairs = Vec::new();
        let mut downfloaters: Vec<&'h PlayerCard> = Vec::new();

        for slot in &mut slots {
            slot.bracket.absorb(std::mem::take(&mut downfloaters));
            slot.advance(BracketState::Resolving);

            let outcome = matcher.resolve(&slot.bracket.players())?;
            debug!(
                "Round {} bracket {}: {} pairs, {} downfloat ({:?})",
                self.round_no,
                slot.bracket.score(),
                outcome.pairs.len(),
                outcome.unmatched.len(),
                rules.level()
            );
            pairs.extend(outcome.pairs);
            downfloaters = outcome.unmatched;
            slot.advance(BracketState::Resolved);
        }

        if downfloaters.is_empty() {
            Ok(Some(pairs))
        } else {
            debug!(
                "Round {}: {} players left unpaired after the last bracket",
                self.round_no,
                downfloaters.len()
            );
            Ok(None)
        }
    }
}

/// Copy of `brackets` without one player; emptied brackets are dropped
fn without<'h>(brackets: &[Bracket<'h>], player: &PlayerCard) -> Vec<Bracket<'h>> {
    brackets
        .iter()
        .cloned()
        .map(|mut bracket| {
            bracket.remove(player.start_no);
            bracket
        })
        .filter(|bracket| !bracket.is_empty())
        .collect()
}

/// Merge the lowest `collapse + 1` brackets into a single bracket
fn collapse_lowest<'h>(brackets: &[Bracket<'h>], collapse: usize) -> Vec<Bracket<'h>> {
    if collapse == 0 || brackets.len() < 2 {
        return brackets.to_vec();
    }
    let split = brackets.len().saturating_sub(collapse + 1);
    let mut merged = Bracket::default();
    merged.absorb(brackets[split..].iter().flat_map(Bracket::players));

    let mut result = brackets[..split].to_vec();
    result.push(merged);
    result
}
