//! Passive damage multipliers.
//!
//! A passive inspects the hand being evaluated, the target, and its own hero's
//! health. When its condition matches it "activates" and contributes a
//! multiplier; otherwise it contributes nothing (an implicit 1.0).

use core::fmt;
use std::sync::Arc;

use super::Health;
use crate::battle::EnemyView;
use crate::card::{HandDescription, HandKind};
use crate::mana::Suit;

/// Inputs a passive may condition on.
#[derive(Clone, Copy, Debug)]
pub struct PassiveContext<'a> {
    pub hand: &'a HandDescription,
    pub target: Option<EnemyView>,
    pub hero_health: Health,
}

/// Condition plus multiplier contributed by a hero's passive.
pub trait PassiveMultiplier: fmt::Debug + Send + Sync {
    /// Returns the multiplier when the passive activates for this evaluation.
    fn evaluate(&self, ctx: &PassiveContext<'_>) -> Option<f64>;
}

/// A named passive owned by a hero.
#[derive(Clone, Debug)]
pub struct Passive {
    name: String,
    multiplier: Arc<dyn PassiveMultiplier>,
}

impl Passive {
    pub fn new(name: impl Into<String>, multiplier: impl PassiveMultiplier + 'static) -> Self {
        Self {
            name: name.into(),
            multiplier: Arc::new(multiplier),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn evaluate(&self, ctx: &PassiveContext<'_>) -> Option<f64> {
        self.multiplier.evaluate(ctx)
    }
}

/// Activates when the hand holds at least `min_cards` cards of `suit`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SuitAffinity {
    pub suit: Suit,
    pub min_cards: usize,
    pub multiplier: f64,
}

impl PassiveMultiplier for SuitAffinity {
    fn evaluate(&self, ctx: &PassiveContext<'_>) -> Option<f64> {
        (ctx.hand.count_suit(self.suit) >= self.min_cards).then_some(self.multiplier)
    }
}

/// Activates for specific hand categories.
#[derive(Clone, Debug, PartialEq)]
pub struct HandKindBonus {
    pub kinds: Vec<HandKind>,
    pub multiplier: f64,
}

impl PassiveMultiplier for HandKindBonus {
    fn evaluate(&self, ctx: &PassiveContext<'_>) -> Option<f64> {
        self.kinds.contains(&ctx.hand.kind).then_some(self.multiplier)
    }
}

/// Activates against a living target at or below a health percentage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Finisher {
    pub threshold_percent: u32,
    pub multiplier: f64,
}

impl PassiveMultiplier for Finisher {
    fn evaluate(&self, ctx: &PassiveContext<'_>) -> Option<f64> {
        let target = ctx.target?;
        (target.is_alive() && target.health_percent() <= self.threshold_percent)
            .then_some(self.multiplier)
    }
}

/// Activates while the owning hero is at or below a health percentage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LastStand {
    pub threshold_percent: u32,
    pub multiplier: f64,
}

impl PassiveMultiplier for LastStand {
    fn evaluate(&self, ctx: &PassiveContext<'_>) -> Option<f64> {
        (ctx.hero_health.percent() <= self.threshold_percent).then_some(self.multiplier)
    }
}
