//! Data-file shapes for heroes, their abilities, and their passives.
//!
//! Specs are plain data. [`HeroSpec::build`] resolves them into core types;
//! the specs themselves never appear in battle state.

use std::collections::BTreeMap;
use std::sync::Arc;

use battle_core::{
    AbilityEffect, ActiveAbility, Cleave, Execute, Finisher, HandKind, HandKindBonus, Hero,
    HeroError, HeroId, LastStand, ManaCost, Passive, Strike, Suit, SuitAffinity,
};

/// Effect procedure of an ability.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectSpec {
    Strike {
        damage: u32,
    },
    Execute {
        damage: u32,
        threshold_percent: u32,
        bonus_multiplier: f64,
    },
    Cleave {
        damage: u32,
    },
}

impl EffectSpec {
    pub fn build(&self) -> Arc<dyn AbilityEffect> {
        match *self {
            Self::Strike { damage } => Arc::new(Strike { damage }),
            Self::Execute {
                damage,
                threshold_percent,
                bonus_multiplier,
            } => Arc::new(Execute {
                damage,
                threshold_percent,
                bonus_multiplier,
            }),
            Self::Cleave { damage } => Arc::new(Cleave { damage }),
        }
    }
}

/// Activation condition of a passive.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConditionSpec {
    SuitAffinity {
        suit: Suit,
        min_cards: usize,
        multiplier: f64,
    },
    HandKind {
        kinds: Vec<HandKind>,
        multiplier: f64,
    },
    Finisher {
        threshold_percent: u32,
        multiplier: f64,
    },
    LastStand {
        threshold_percent: u32,
        multiplier: f64,
    },
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassiveSpec {
    pub name: String,
    pub condition: ConditionSpec,
}

impl PassiveSpec {
    pub fn build(&self) -> Passive {
        match &self.condition {
            ConditionSpec::SuitAffinity {
                suit,
                min_cards,
                multiplier,
            } => Passive::new(
                &self.name,
                SuitAffinity {
                    suit: *suit,
                    min_cards: *min_cards,
                    multiplier: *multiplier,
                },
            ),
            ConditionSpec::HandKind { kinds, multiplier } => Passive::new(
                &self.name,
                HandKindBonus {
                    kinds: kinds.clone(),
                    multiplier: *multiplier,
                },
            ),
            ConditionSpec::Finisher {
                threshold_percent,
                multiplier,
            } => Passive::new(
                &self.name,
                Finisher {
                    threshold_percent: *threshold_percent,
                    multiplier: *multiplier,
                },
            ),
            ConditionSpec::LastStand {
                threshold_percent,
                multiplier,
            } => Passive::new(
                &self.name,
                LastStand {
                    threshold_percent: *threshold_percent,
                    multiplier: *multiplier,
                },
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilitySpec {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// Per-suit cost. Omitted suits cost nothing.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cost: BTreeMap<Suit, u8>,
    pub cooldown: u32,
    pub effect: EffectSpec,
}

impl AbilitySpec {
    pub fn cost(&self) -> ManaCost {
        self.cost
            .iter()
            .map(|(&suit, &amount)| (suit, amount))
            .collect()
    }

    pub fn build(&self) -> ActiveAbility {
        ActiveAbility::from_shared(
            self.name.clone(),
            self.cost(),
            self.cooldown,
            self.effect.build(),
        )
        .with_description(self.description.clone())
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeroSpec {
    pub id: u32,
    pub name: String,
    pub max_health: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<AbilitySpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub passives: Vec<PassiveSpec>,
}

impl HeroSpec {
    pub fn hero_id(&self) -> HeroId {
        HeroId(self.id)
    }

    /// Resolves the spec into a fresh hero with every cooldown ready.
    pub fn build(&self) -> Result<Hero, HeroError> {
        let mut hero = Hero::new(self.hero_id(), self.name.clone(), self.max_health);
        for ability in &self.abilities {
            hero.push_ability(ability.build())?;
        }
        Ok(self
            .passives
            .iter()
            .fold(hero, |hero, passive| hero.with_passive(passive.build())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{BattleError, Card, HandDescription, Rank};

    fn lancer() -> HeroSpec {
        HeroSpec {
            id: 3,
            name: "Lancer".to_owned(),
            max_health: 35,
            abilities: vec![AbilitySpec {
                name: "Pierce".to_owned(),
                description: "A precise thrust.".to_owned(),
                cost: BTreeMap::from([(Suit::Spades, 2), (Suit::Clubs, 1)]),
                cooldown: 2,
                effect: EffectSpec::Strike { damage: 14 },
            }],
            passives: vec![PassiveSpec {
                name: "Club Drill".to_owned(),
                condition: ConditionSpec::SuitAffinity {
                    suit: Suit::Clubs,
                    min_cards: 2,
                    multiplier: 1.5,
                },
            }],
        }
    }

    #[test]
    fn builds_hero_with_abilities_and_passives() {
        let mut hero = lancer().build().unwrap();

        assert_eq!(hero.id(), HeroId(3));
        let pierce = hero.ability(0).unwrap();
        assert_eq!(pierce.cost().amount(Suit::Spades), 2);
        assert_eq!(pierce.cost().amount(Suit::Clubs), 1);
        assert_eq!(pierce.cooldown_max(), 2);
        assert_eq!(pierce.description(), "A precise thrust.");

        let hand = HandDescription::new(
            HandKind::Pair,
            [Card::new(Rank::Jack, Suit::Clubs), Card::new(Rank::Jack, Suit::Clubs)],
        );
        assert_eq!(hero.calculate_multiplier(&hand, None), 1.5);
        assert_eq!(hero.last_activated(), ["Club Drill"]);
    }

    #[test]
    fn too_many_abilities_is_rejected() {
        let mut spec = lancer();
        spec.abilities = vec![spec.abilities[0].clone(); 5];

        let err = spec.build().unwrap_err();
        assert_eq!(err.error_code(), "HERO_ABILITY_SLOTS_FULL");
    }
}
