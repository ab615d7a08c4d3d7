use core::fmt;
use std::sync::Arc;

use super::effect::{AbilityEffect, EffectCompletion};
use crate::battle::{BattleContext, EnemyId};
use crate::error::{BattleError, ErrorContext, ErrorSeverity};
use crate::hero::HeroId;
use crate::mana::{LedgerError, ManaCost, ManaLedger, Suit};

/// A hero-owned, costed, cooldown-gated action that requires a target.
///
/// # Invariants
///
/// - `cooldown_remaining <= cooldown_max`
/// - `cooldown_remaining` only rises through [`ActiveAbility::start_cooldown`]
#[derive(Clone, Debug)]
pub struct ActiveAbility {
    name: String,
    description: String,
    cost: ManaCost,
    cooldown_max: u32,
    cooldown_remaining: u32,
    effect: Arc<dyn AbilityEffect>,
}

impl ActiveAbility {
    pub fn new(
        name: impl Into<String>,
        cost: ManaCost,
        cooldown_max: u32,
        effect: impl AbilityEffect + 'static,
    ) -> Self {
        Self::from_shared(name, cost, cooldown_max, Arc::new(effect))
    }

    pub fn from_shared(
        name: impl Into<String>,
        cost: ManaCost,
        cooldown_max: u32,
        effect: Arc<dyn AbilityEffect>,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            cost,
            cooldown_max,
            cooldown_remaining: 0,
            effect,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Starts the ability part-way through its cooldown. Clamped to `cooldown_max`.
    #[must_use]
    pub fn with_cooldown_remaining(mut self, remaining: u32) -> Self {
        self.cooldown_remaining = remaining.min(self.cooldown_max);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn cost(&self) -> &ManaCost {
        &self.cost
    }

    pub fn cooldown_max(&self) -> u32 {
        self.cooldown_max
    }

    pub fn cooldown_remaining(&self) -> u32 {
        self.cooldown_remaining
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown_remaining == 0
    }

    /// Checks cooldown first, then affordability.
    pub fn check_castable(&self, ledger: &ManaLedger) -> Result<(), IneligibleReason> {
        if self.cooldown_remaining > 0 {
            return Err(IneligibleReason::OnCooldown {
                remaining: self.cooldown_remaining,
            });
        }
        match ledger.shortfall(&self.cost) {
            Some(LedgerError::Overdraw {
                suit,
                required,
                available,
            }) => Err(IneligibleReason::InsufficientMana {
                suit,
                required,
                available,
            }),
            None => Ok(()),
        }
    }

    pub fn can_cast(&self, ledger: &ManaLedger) -> CastEligibility {
        match self.check_castable(ledger) {
            Ok(()) => CastEligibility::ELIGIBLE,
            Err(reason) => CastEligibility::blocked(reason),
        }
    }

    /// Runs the effect procedure. Does not touch mana or cooldown.
    pub fn execute(&self, target: EnemyId, ctx: &mut dyn BattleContext) -> EffectCompletion {
        self.effect.apply(target, ctx)
    }

    pub fn start_cooldown(&mut self) {
        self.cooldown_remaining = self.cooldown_max;
    }

    /// Ticks one turn off the cooldown, floored at zero.
    pub fn reduce_cooldown(&mut self) {
        self.cooldown_remaining = self.cooldown_remaining.saturating_sub(1);
    }
}

/// Why an ability cannot be cast right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IneligibleReason {
    OnCooldown {
        remaining: u32,
    },
    InsufficientMana {
        suit: Suit,
        required: u8,
        available: u8,
    },
}

impl fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnCooldown { .. } => f.write_str("on cooldown"),
            Self::InsufficientMana { .. } => f.write_str("insufficient mana"),
        }
    }
}

/// Presentation-facing answer to "can this ability be cast now?".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastEligibility {
    pub can_cast: bool,
    pub reason: Option<IneligibleReason>,
}

impl CastEligibility {
    pub const ELIGIBLE: Self = Self {
        can_cast: true,
        reason: None,
    };

    pub const fn blocked(reason: IneligibleReason) -> Self {
        Self {
            can_cast: false,
            reason: Some(reason),
        }
    }
}

/// Errors raised when selecting an ability for casting.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastError {
    #[error("on cooldown ({remaining} turns remaining)")]
    OnCooldown {
        remaining: u32,
        #[cfg_attr(feature = "serde", serde(skip))]
        context: ErrorContext,
    },

    #[error("insufficient mana: {suit} needs {required}, have {available}")]
    InsufficientMana {
        suit: Suit,
        required: u8,
        available: u8,
        #[cfg_attr(feature = "serde", serde(skip))]
        context: ErrorContext,
    },

    #[error("{hero} has no ability in slot {slot}")]
    UnknownAbility {
        hero: HeroId,
        slot: u8,
        #[cfg_attr(feature = "serde", serde(skip))]
        context: ErrorContext,
    },
}

impl CastError {
    /// Creates the error matching an eligibility failure.
    pub fn ineligible(reason: IneligibleReason, context: ErrorContext) -> Self {
        match reason {
            IneligibleReason::OnCooldown { remaining } => Self::OnCooldown { remaining, context },
            IneligibleReason::InsufficientMana {
                suit,
                required,
                available,
            } => Self::InsufficientMana {
                suit,
                required,
                available,
                context,
            },
        }
    }

    pub fn unknown_ability(hero: HeroId, slot: u8, turn: u32) -> Self {
        Self::UnknownAbility {
            hero,
            slot,
            context: ErrorContext::new(turn)
                .with_hero(hero)
                .with_slot(slot)
                .with_message("ability lookup failed"),
        }
    }

    /// The presentation reason, when the failure is an eligibility failure.
    pub fn reason(&self) -> Option<IneligibleReason> {
        match *self {
            Self::OnCooldown { remaining, .. } => Some(IneligibleReason::OnCooldown { remaining }),
            Self::InsufficientMana {
                suit,
                required,
                available,
                ..
            } => Some(IneligibleReason::InsufficientMana {
                suit,
                required,
                available,
            }),
            Self::UnknownAbility { .. } => None,
        }
    }
}

impl BattleError for CastError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::OnCooldown { .. } | Self::InsufficientMana { .. } => ErrorSeverity::Recoverable,
            Self::UnknownAbility { .. } => ErrorSeverity::Validation,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::OnCooldown { context, .. }
            | Self::InsufficientMana { context, .. }
            | Self::UnknownAbility { context, .. } => Some(context),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::OnCooldown { .. } => "CAST_ON_COOLDOWN",
            Self::InsufficientMana { .. } => "CAST_INSUFFICIENT_MANA",
            Self::UnknownAbility { .. } => "CAST_UNKNOWN_ABILITY",
        }
    }
}
