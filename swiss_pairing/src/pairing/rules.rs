//! Pairing constraints.
//!
//! Each constraint is a [`PairingRule`]; the active set depends on the
//! [`ConstraintLevel`] of the current resolution attempt. No-rematch is part of
//! every level.

use enum_dispatch::enum_dispatch;
use std::cmp::Ordering;

use super::colour::ColourAllocator;
use crate::history::{Float, PlayerCard};

/// Round-wide inputs shared by all rules
#[derive(Clone, Copy, Debug)]
pub struct RuleContext {
    pub colours: ColourAllocator,
    pub max_colour_difference: u32,
}

/// A constraint on a candidate pair
#[enum_dispatch]
pub trait PairingRule {
    /// Whether `higher` may meet `lower`; `higher` is ranked above `lower`
    fn permits(&self, ctx: &RuleContext, higher: &PlayerCard, lower: &PlayerCard) -> bool;
}

/// Players never meet twice
#[derive(Clone, Copy, Debug)]
pub struct NoRematch;

impl PairingRule for NoRematch {
    fn permits(&self, _ctx: &RuleContext, higher: &PlayerCard, lower: &PlayerCard) -> bool {
        !higher.has_met(lower.start_no) && !lower.has_met(higher.start_no)
    }
}

/// The allocated colours keep both players within the colour bounds
#[derive(Clone, Copy, Debug)]
pub struct ColourBalance;

impl PairingRule for ColourBalance {
    fn permits(&self, ctx: &RuleContext, higher: &PlayerCard, lower: &PlayerCard) -> bool {
        let assignment = ctx.colours.allocate(higher, lower);
        [higher, lower].into_iter().all(|card| {
            !ColourAllocator::breaks_balance(
                card,
                assignment.colour_of(card.start_no),
                ctx.max_colour_difference,
            )
        })
    }
}

/// Nobody floats in the same direction two rounds running
#[derive(Clone, Copy, Debug)]
pub struct FloatAlternation;

impl PairingRule for FloatAlternation {
    fn permits(&self, _ctx: &RuleContext, higher: &PlayerCard, lower: &PlayerCard) -> bool {
        match higher.score().cmp(&lower.score()) {
            Ordering::Equal => true,
            Ordering::Greater => higher.last_float() != Float::Down && lower.last_float() != Float::Up,
            Ordering::Less => higher.last_float() != Float::Up && lower.last_float() != Float::Down,
        }
    }
}

#[enum_dispatch(PairingRule)]
#[derive(Clone, Copy, Debug)]
pub enum Rule {
    NoRematch,
    ColourBalance,
    FloatAlternation,
}

/// Which rules a resolution attempt enforces
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConstraintLevel {
    /// No-rematch, colour balance and float alternation
    Strict,
    /// No-rematch only
    Relaxed,
}

impl ConstraintLevel {
    /// Levels to try in order. The final round goes straight to `Relaxed`.
    pub fn sequence(apply_last: bool) -> &'static [ConstraintLevel] {
        if apply_last {
            &[ConstraintLevel::Relaxed]
        } else {
            &[ConstraintLevel::Strict, ConstraintLevel::Relaxed]
        }
    }

    pub fn rules(self) -> Vec<Rule> {
        match self {
            ConstraintLevel::Strict => vec![
                NoRematch.into(),
                ColourBalance.into(),
                FloatAlternation.into(),
            ],
            ConstraintLevel::Relaxed => vec![NoRematch.into()],
        }
    }

    pub fn checks_floats(self) -> bool {
        self == ConstraintLevel::Strict
    }
}

/// The rules of one level bound to the round context
#[derive(Clone, Debug)]
pub struct RuleSet {
    level: ConstraintLevel,
    rules: Vec<Rule>,
    ctx: RuleContext,
}

impl RuleSet {
    pub fn new(level: ConstraintLevel, ctx: RuleContext) -> Self {
        Self {
            level,
            rules: level.rules(),
            ctx,
        }
    }

    pub fn level(&self) -> ConstraintLevel {
        self.level
    }

    pub fn context(&self) -> &RuleContext {
        &self.ctx
    }

    /// Whether `a` and `b` may be paired, in either order
    pub fn permits(&self, a: &PlayerCard, b: &PlayerCard) -> bool {
        let (higher, lower) = if ranks_above(a, b) { (a, b) } else { (b, a) };
        self.rules
            .iter()
            .all(|rule| rule.permits(&self.ctx, higher, lower))
    }
}

/// Rank order used everywhere: score descending, then starting number ascending
pub fn ranks_above(a: &PlayerCard, b: &PlayerCard) -> bool {
    match a.score().cmp(&b.score()) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => a.start_no < b.start_no,
    }
}
