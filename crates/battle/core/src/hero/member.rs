use core::fmt;

use arrayvec::ArrayVec;

use super::passive::{Passive, PassiveContext};
use crate::ability::ActiveAbility;
use crate::battle::EnemyView;
use crate::card::HandDescription;
use crate::config::BattleConfig;
use crate::error::{BattleError, ErrorContext, ErrorSeverity};

/// Stable hero identity, used for persistence and ability references.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeroId(pub u32);

impl fmt::Display for HeroId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hero#{}", self.0)
    }
}

/// Current and maximum health.
///
/// Written by the battle's damage system; the core only reads it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Health {
    pub const fn new(current: u32, max: u32) -> Self {
        Self {
            current: if current > max { max } else { current },
            max,
        }
    }

    pub const fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn percent(&self) -> u32 {
        if self.max == 0 {
            return 0;
        }
        ((u64::from(self.current) * 100) / u64::from(self.max)) as u32
    }
}

/// Ability storage with a fixed per-hero capacity.
pub type HeroAbilities = ArrayVec<ActiveAbility, { BattleConfig::MAX_ABILITIES_PER_HERO }>;

/// A party member: abilities it can cast plus passives that scale hand damage.
#[derive(Clone, Debug)]
pub struct Hero {
    id: HeroId,
    name: String,
    health: Health,
    abilities: HeroAbilities,
    passives: Vec<Passive>,
    last_activated: Vec<String>,
}

impl Hero {
    pub fn new(id: HeroId, name: impl Into<String>, max_health: u32) -> Self {
        Self {
            id,
            name: name.into(),
            health: Health::full(max_health),
            abilities: HeroAbilities::new(),
            passives: Vec::new(),
            last_activated: Vec::new(),
        }
    }

    /// Adds an ability (builder pattern). Fails once all slots are taken.
    pub fn with_ability(mut self, ability: ActiveAbility) -> Result<Self, HeroError> {
        self.push_ability(ability)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_passive(mut self, passive: Passive) -> Self {
        self.passives.push(passive);
        self
    }

    /// Appends an ability and returns its slot.
    pub fn push_ability(&mut self, ability: ActiveAbility) -> Result<u8, HeroError> {
        let slot = self.abilities.len() as u8;
        self.abilities
            .try_push(ability)
            .map_err(|_| HeroError::AbilitySlotsFull {
                hero: self.id,
                context: ErrorContext::default().with_hero(self.id),
            })?;
        Ok(slot)
    }

    pub fn id(&self) -> HeroId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn health(&self) -> Health {
        self.health
    }

    /// Mirrors the battle's damage system into the hero. Clamped to max health.
    pub fn set_health(&mut self, current: u32) {
        self.health = Health::new(current, self.health.max);
    }

    pub fn abilities(&self) -> &[ActiveAbility] {
        &self.abilities
    }

    pub fn ability(&self, slot: u8) -> Option<&ActiveAbility> {
        self.abilities.get(usize::from(slot))
    }

    pub fn ability_mut(&mut self, slot: u8) -> Option<&mut ActiveAbility> {
        self.abilities.get_mut(usize::from(slot))
    }

    pub fn passives(&self) -> &[Passive] {
        &self.passives
    }

    /// Passive names that activated during the most recent evaluation.
    pub fn last_activated(&self) -> &[String] {
        &self.last_activated
    }

    pub fn reduce_cooldowns(&mut self) {
        for ability in &mut self.abilities {
            ability.reduce_cooldown();
        }
    }

    /// Combined multiplier of every passive that activates for this hand.
    ///
    /// Replaces `last_activated` with the passives that matched. Heroes
    /// without a matching passive contribute 1.0.
    pub fn calculate_multiplier(
        &mut self,
        hand: &HandDescription,
        target: Option<EnemyView>,
    ) -> f64 {
        let ctx = PassiveContext {
            hand,
            target,
            hero_health: self.health,
        };

        self.last_activated.clear();
        let mut multiplier = 1.0;
        for passive in &self.passives {
            if let Some(value) = passive.evaluate(&ctx) {
                tracing::trace!(hero = %self.id, passive = passive.name(), value, "passive activated");
                multiplier *= value.max(0.0);
                self.last_activated.push(passive.name().to_owned());
            }
        }
        multiplier
    }
}

/// Errors raised while assembling a hero.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HeroError {
    #[error("{hero} already owns {} abilities", BattleConfig::MAX_ABILITIES_PER_HERO)]
    AbilitySlotsFull { hero: HeroId, context: ErrorContext },
}

impl BattleError for HeroError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::AbilitySlotsFull { context, .. } => Some(context),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AbilitySlotsFull { .. } => "HERO_ABILITY_SLOTS_FULL",
        }
    }
}
