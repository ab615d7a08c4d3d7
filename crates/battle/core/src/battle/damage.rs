//! Multiplicative damage composition across the party.
//!
//! `final = floor(base * Π multiplier_i)` over every hero in roster order.
//! Each hero is evaluated exactly once per composition, which also refreshes
//! that hero's `last_activated` list for presentation.

use super::context::EnemyView;
use crate::card::HandDescription;
use crate::hero::{HeroId, HeroRoster};

/// One hero's share of a composition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeroContribution {
    pub hero: HeroId,
    /// Product of the hero's activated passives; 1.0 when none activated.
    pub multiplier: f64,
    /// Names of the passives that activated, in evaluation order.
    pub activated: Vec<String>,
}

impl HeroContribution {
    pub fn is_activated(&self) -> bool {
        !self.activated.is_empty()
    }
}

/// Result of composing a hand's damage against a target.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageComposition {
    pub base_damage: u32,
    pub final_damage: u32,
    pub contributions: Vec<HeroContribution>,
}

impl DamageComposition {
    /// Combined multiplier applied to the base damage.
    pub fn total_multiplier(&self) -> f64 {
        self.contributions
            .iter()
            .map(|contribution| contribution.multiplier)
            .product()
    }

    /// Heroes whose passives activated, in roster order.
    pub fn activated_heroes(&self) -> impl Iterator<Item = HeroId> + '_ {
        self.contributions
            .iter()
            .filter(|contribution| contribution.is_activated())
            .map(|contribution| contribution.hero)
    }
}

/// Stateless damage pipeline.
///
/// Link-agnostic: a chain of hands calls [`DamageComposer::compose`] once per
/// link and aggregates the results itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct DamageComposer;

impl DamageComposer {
    pub fn compose(
        roster: &mut HeroRoster,
        base_damage: u32,
        hand: &HandDescription,
        target: Option<EnemyView>,
    ) -> DamageComposition {
        let mut product = 1.0_f64;
        let mut contributions = Vec::with_capacity(roster.len());

        for hero in roster.heroes_mut() {
            let multiplier = hero.calculate_multiplier(hand, target);
            product *= multiplier;
            contributions.push(HeroContribution {
                hero: hero.id(),
                multiplier,
                activated: hero.last_activated().to_vec(),
            });
        }

        let final_damage = apply_multiplier(base_damage, product);
        tracing::debug!(
            base_damage,
            final_damage,
            multiplier = product,
            hand = %hand.kind,
            "damage composed"
        );

        DamageComposition {
            base_damage,
            final_damage,
            contributions,
        }
    }
}

fn apply_multiplier(base: u32, multiplier: f64) -> u32 {
    let raw = (f64::from(base) * multiplier).floor();
    if raw.is_nan() || raw <= 0.0 {
        0
    } else if raw >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        raw as u32
    }
}
