//! Ordered party of heroes.
//!
//! Roster order is significant: it fixes the flattened hotkey order of
//! abilities and the order in which passives are evaluated. Membership only
//! changes between battles; the roster is locked while a battle runs.

use core::fmt;

use arrayvec::ArrayVec;

use super::{Hero, HeroId};
use crate::ability::ActiveAbility;
use crate::config::BattleConfig;
use crate::error::{BattleError, ErrorContext, ErrorSeverity};

/// Reference to one ability: the owning hero plus its slot on that hero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityRef {
    pub hero: HeroId,
    pub slot: u8,
}

impl AbilityRef {
    pub const fn new(hero: HeroId, slot: u8) -> Self {
        Self { hero, slot }
    }
}

impl fmt::Display for AbilityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/slot{}", self.hero, self.slot)
    }
}

/// Persisted party composition: hero identities in order plus the index of
/// the hero shown as "active". Mid-battle state is never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RosterSnapshot {
    pub heroes: Vec<HeroId>,
    pub active: usize,
}

#[derive(Clone, Debug, Default)]
pub struct HeroRoster {
    heroes: ArrayVec<Hero, { BattleConfig::MAX_PARTY_SIZE }>,
    active: usize,
    locked: bool,
}

impl HeroRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a roster from heroes in order.
    pub fn from_heroes(heroes: impl IntoIterator<Item = Hero>) -> Result<Self, RosterError> {
        let mut roster = Self::new();
        for hero in heroes {
            roster.add(hero)?;
        }
        Ok(roster)
    }

    /// Rebuilds a roster from a snapshot, resolving each id through `resolve`.
    pub fn from_snapshot(
        snapshot: &RosterSnapshot,
        mut resolve: impl FnMut(HeroId) -> Option<Hero>,
    ) -> Result<Self, RosterError> {
        let mut roster = Self::new();
        for &id in &snapshot.heroes {
            let hero = resolve(id).ok_or(RosterError::HeroNotFound {
                hero: id,
                context: ErrorContext::default()
                    .with_hero(id)
                    .with_message("snapshot references unknown hero"),
            })?;
            roster.add(hero)?;
        }
        if !roster.is_empty() {
            roster.set_active(snapshot.active)?;
        }
        Ok(roster)
    }

    pub fn snapshot(&self) -> RosterSnapshot {
        RosterSnapshot {
            heroes: self.heroes.iter().map(Hero::id).collect(),
            active: self.active,
        }
    }

    pub fn len(&self) -> usize {
        self.heroes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub(crate) fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn heroes(&self) -> &[Hero] {
        &self.heroes
    }

    pub fn heroes_mut(&mut self) -> impl Iterator<Item = &mut Hero> {
        self.heroes.iter_mut()
    }

    pub fn get(&self, id: HeroId) -> Option<&Hero> {
        self.heroes.iter().find(|hero| hero.id() == id)
    }

    pub fn get_mut(&mut self, id: HeroId) -> Option<&mut Hero> {
        self.heroes.iter_mut().find(|hero| hero.id() == id)
    }

    pub fn add(&mut self, hero: Hero) -> Result<(), RosterError> {
        let id = hero.id();
        if self.locked {
            return Err(RosterError::locked(id));
        }
        if self.get(id).is_some() {
            return Err(RosterError::DuplicateHero {
                hero: id,
                context: ErrorContext::default().with_hero(id),
            });
        }
        self.heroes.try_push(hero).map_err(|_| RosterError::PartyFull {
            context: ErrorContext::default().with_hero(id),
        })
    }

    pub fn remove(&mut self, id: HeroId) -> Result<Hero, RosterError> {
        if self.locked {
            return Err(RosterError::locked(id));
        }
        let index = self
            .heroes
            .iter()
            .position(|hero| hero.id() == id)
            .ok_or(RosterError::HeroNotFound {
                hero: id,
                context: ErrorContext::default().with_hero(id),
            })?;
        let hero = self.heroes.remove(index);

        if index < self.active || self.active >= self.heroes.len() {
            self.active = self.active.saturating_sub(1);
        }
        Ok(hero)
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_hero(&self) -> Option<&Hero> {
        self.heroes.get(self.active)
    }

    /// Marks which hero is active for display. Allowed mid-battle.
    pub fn set_active(&mut self, index: usize) -> Result<(), RosterError> {
        if index >= self.heroes.len() {
            return Err(RosterError::ActiveOutOfRange {
                index,
                len: self.heroes.len(),
                context: ErrorContext::default(),
            });
        }
        self.active = index;
        Ok(())
    }

    /// Every ability in stable order: roster order, then slot order.
    pub fn ability_refs(&self) -> Vec<AbilityRef> {
        self.heroes
            .iter()
            .flat_map(|hero| {
                (0..hero.abilities().len()).map(move |slot| AbilityRef::new(hero.id(), slot as u8))
            })
            .collect()
    }

    /// Looks up the n-th ability (0-based) in the flattened order.
    pub fn ability_at(&self, index: usize) -> Option<AbilityRef> {
        self.ability_refs().get(index).copied()
    }

    pub fn ability_count(&self) -> usize {
        self.heroes.iter().map(|hero| hero.abilities().len()).sum()
    }

    pub fn ability(&self, ability: AbilityRef) -> Option<&ActiveAbility> {
        self.get(ability.hero)?.ability(ability.slot)
    }

    pub fn ability_mut(&mut self, ability: AbilityRef) -> Option<&mut ActiveAbility> {
        self.get_mut(ability.hero)?.ability_mut(ability.slot)
    }

    /// Ticks every cooldown of every hero once, active or not.
    ///
    /// Not idempotent: two calls tick twice. Turn bookkeeping that must run
    /// once per end-of-turn lives in [`crate::battle::TurnCycle`].
    pub fn tick_cooldowns(&mut self) {
        for hero in &mut self.heroes {
            hero.reduce_cooldowns();
        }
    }
}

/// Errors raised by roster management.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("roster cannot change while a battle is in progress")]
    Locked { context: ErrorContext },

    #[error("party already has {} heroes", BattleConfig::MAX_PARTY_SIZE)]
    PartyFull { context: ErrorContext },

    #[error("{hero} is already in the party")]
    DuplicateHero { hero: HeroId, context: ErrorContext },

    #[error("{hero} is not in the party")]
    HeroNotFound { hero: HeroId, context: ErrorContext },

    #[error("active index {index} out of range for party of {len}")]
    ActiveOutOfRange {
        index: usize,
        len: usize,
        context: ErrorContext,
    },
}

impl RosterError {
    fn locked(hero: HeroId) -> Self {
        Self::Locked {
            context: ErrorContext::default()
                .with_hero(hero)
                .with_message("membership is fixed mid-battle"),
        }
    }

    pub(crate) fn in_battle(turn: u32) -> Self {
        Self::Locked {
            context: ErrorContext::new(turn).with_message("roster is read-only mid-battle"),
        }
    }

    pub(crate) fn not_found(hero: HeroId) -> Self {
        Self::HeroNotFound {
            hero,
            context: ErrorContext::default().with_hero(hero),
        }
    }
}

impl BattleError for RosterError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Locked { .. } => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::Locked { context }
            | Self::PartyFull { context }
            | Self::DuplicateHero { context, .. }
            | Self::HeroNotFound { context, .. }
            | Self::ActiveOutOfRange { context, .. } => Some(context),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Locked { .. } => "ROSTER_LOCKED",
            Self::PartyFull { .. } => "ROSTER_PARTY_FULL",
            Self::DuplicateHero { .. } => "ROSTER_DUPLICATE_HERO",
            Self::HeroNotFound { .. } => "ROSTER_HERO_NOT_FOUND",
            Self::ActiveOutOfRange { .. } => "ROSTER_ACTIVE_OUT_OF_RANGE",
        }
    }
}
