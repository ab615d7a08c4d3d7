//! Targeting state machine.
//!
//! ```text
//!            select_ability (eligible)
//!   Idle ─────────────────────────────▶ AwaitingTarget(ability)
//!    ▲                                   │    │    │
//!    │  valid target: debit, execute,    │    │    │ select another ability
//!    │  start cooldown                   │    │    └──▶ AwaitingTarget(other)
//!    ├───────────────────────────────────┘    │
//!    │  cancel                                │ missing/dead target
//!    └────────────────────────────────────────┤──▶ (ignored, stays awaiting)
//! ```
//!
//! Ineligible selections never change the mode, and misclicks never spend
//! anything. Exactly one session exists per battle because the session is a
//! plain field of the owning aggregate.

use core::fmt;

use super::context::{BattleContext, EnemyId};
use super::input::HotkeyError;
use crate::ability::{CastError, EffectCompletion, IneligibleReason};
use crate::error::ErrorContext;
use crate::hero::{AbilityRef, HeroRoster};
use crate::mana::{LedgerError, ManaChange, ManaLedger};

/// Whether input is currently being interpreted as a target click.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetingMode {
    #[default]
    Idle,
    AwaitingTarget(AbilityRef),
}

/// Sequence number of a resolved cast, unique within a session owner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastId(pub u64);

impl fmt::Display for CastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cast#{}", self.0)
    }
}

/// Result of a successful selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectOutcome {
    pub selected: AbilityRef,
    /// Pending selection discarded by this one, if any. Nothing was spent on it.
    pub replaced: Option<AbilityRef>,
}

/// Errors from the hotkey selection path.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    #[error(transparent)]
    Hotkey(#[from] HotkeyError),
    #[error(transparent)]
    Cast(#[from] CastError),
}

/// Everything the economy did for one resolved cast.
#[derive(Debug)]
pub struct CastReport {
    pub id: CastId,
    pub ability: AbilityRef,
    pub name: String,
    pub target: EnemyId,
    pub mana_changes: Vec<ManaChange>,
    /// Effect completion. The cast is already final when this is pending.
    pub completion: EffectCompletion,
}

/// Result of routing a target click into the session.
#[derive(Debug)]
pub enum TargetOutcome {
    /// No ability was awaiting a target.
    NotTargeting,
    /// Missing or dead target. Nothing spent; the session keeps waiting.
    Ignored,
    /// The cast resolved and the session is idle again.
    Handled(CastReport),
    /// The pending ability could no longer be cast; the session was closed
    /// without spending anything.
    Aborted(CastError),
}

impl TargetOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled(_))
    }
}

#[derive(Clone, Debug, Default)]
pub struct TargetingSession {
    mode: TargetingMode,
    next_cast: u64,
}

impl TargetingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> TargetingMode {
        self.mode
    }

    pub fn pending(&self) -> Option<AbilityRef> {
        match self.mode {
            TargetingMode::Idle => None,
            TargetingMode::AwaitingTarget(ability) => Some(ability),
        }
    }

    pub fn is_awaiting_target(&self) -> bool {
        self.pending().is_some()
    }

    /// Opens (or re-targets) the session for an eligible ability.
    ///
    /// Ineligible or unknown abilities leave the mode untouched, including any
    /// selection already pending.
    pub fn select_ability(
        &mut self,
        roster: &HeroRoster,
        ledger: &ManaLedger,
        ability: AbilityRef,
        turn: u32,
    ) -> Result<SelectOutcome, CastError> {
        let candidate = roster
            .ability(ability)
            .ok_or_else(|| CastError::unknown_ability(ability.hero, ability.slot, turn))?;

        if let Err(reason) = candidate.check_castable(ledger) {
            tracing::debug!(%ability, %reason, "ability selection rejected");
            return Err(CastError::ineligible(reason, context_for(ability, turn)));
        }

        let replaced = self.pending();
        self.mode = TargetingMode::AwaitingTarget(ability);
        tracing::debug!(%ability, ?replaced, "awaiting target");
        Ok(SelectOutcome {
            selected: ability,
            replaced,
        })
    }

    /// Selects the n-th (0-based) ability in flattened roster order.
    pub fn cast_by_index(
        &mut self,
        roster: &HeroRoster,
        ledger: &ManaLedger,
        index: usize,
        turn: u32,
    ) -> Result<SelectOutcome, SelectError> {
        let Some(ability) = roster.ability_at(index) else {
            let err = HotkeyError::out_of_range(index, roster.ability_count(), turn);
            tracing::warn!(index, %err, "hotkey rejected");
            return Err(err.into());
        };
        Ok(self.select_ability(roster, ledger, ability, turn)?)
    }

    /// Resolves the pending ability against a clicked target.
    ///
    /// Order on success: debit the full cost, run the effect, start the
    /// cooldown, return to idle.
    pub fn on_target_chosen(
        &mut self,
        roster: &mut HeroRoster,
        ledger: &mut ManaLedger,
        target: Option<EnemyId>,
        ctx: &mut dyn BattleContext,
        turn: u32,
    ) -> TargetOutcome {
        let TargetingMode::AwaitingTarget(pending) = self.mode else {
            return TargetOutcome::NotTargeting;
        };

        let Some(target) =
            target.filter(|&id| ctx.enemy(id).is_some_and(|enemy| enemy.is_alive()))
        else {
            tracing::debug!(ability = %pending, ?target, "ignored invalid target");
            return TargetOutcome::Ignored;
        };

        let Some(ability) = roster.ability_mut(pending) else {
            self.mode = TargetingMode::Idle;
            tracing::warn!(ability = %pending, "pending ability no longer exists");
            return TargetOutcome::Aborted(CastError::unknown_ability(
                pending.hero,
                pending.slot,
                turn,
            ));
        };

        if !ability.is_ready() {
            self.mode = TargetingMode::Idle;
            let reason = IneligibleReason::OnCooldown {
                remaining: ability.cooldown_remaining(),
            };
            return TargetOutcome::Aborted(CastError::ineligible(
                reason,
                context_for(pending, turn),
            ));
        }

        let mana_changes = match ledger.debit_cost(ability.cost()) {
            Ok(changes) => changes,
            Err(LedgerError::Overdraw {
                suit,
                required,
                available,
            }) => {
                self.mode = TargetingMode::Idle;
                let reason = IneligibleReason::InsufficientMana {
                    suit,
                    required,
                    available,
                };
                return TargetOutcome::Aborted(CastError::ineligible(
                    reason,
                    context_for(pending, turn),
                ));
            }
        };

        let completion = ability.execute(target, ctx);
        ability.start_cooldown();
        self.mode = TargetingMode::Idle;

        let id = CastId(self.next_cast);
        self.next_cast += 1;
        tracing::debug!(
            %id,
            ability = %pending,
            name = ability.name(),
            %target,
            pending_effect = completion.is_pending(),
            "cast resolved"
        );

        TargetOutcome::Handled(CastReport {
            id,
            ability: pending,
            name: ability.name().to_owned(),
            target,
            mana_changes,
            completion,
        })
    }

    /// Discards the pending selection. No ledger mutation.
    pub fn cancel(&mut self) -> Option<AbilityRef> {
        let cancelled = self.pending();
        if let Some(ability) = cancelled {
            tracing::debug!(%ability, "targeting cancelled");
        }
        self.mode = TargetingMode::Idle;
        cancelled
    }
}

fn context_for(ability: AbilityRef, turn: u32) -> ErrorContext {
    ErrorContext::new(turn)
        .with_hero(ability.hero)
        .with_slot(ability.slot)
}
