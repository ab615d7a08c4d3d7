//! Start/end-of-turn hooks.
//!
//! Cooldowns only tick at turn end, and only once per turn: a second
//! `on_turn_end` without a `on_turn_start` in between is refused.

use crate::error::{BattleError, ErrorContext, ErrorSeverity};
use crate::hero::HeroRoster;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TurnPhase {
    /// No turn has started yet this battle.
    #[default]
    Setup,
    InProgress,
    Ended,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnError {
    #[error("turn {turn} has already ended")]
    AlreadyEnded {
        turn: u32,
        #[cfg_attr(feature = "serde", serde(skip))]
        context: ErrorContext,
    },
}

impl BattleError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::AlreadyEnded { context, .. } => Some(context),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyEnded { .. } => "TURN_ALREADY_ENDED",
        }
    }
}

/// Turn counter plus the phase guard that keeps cooldown ticks to one per turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnCycle {
    turn: u32,
    phase: TurnPhase,
}

impl TurnCycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current turn number. Zero before the first turn starts.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Opens the next turn and returns its number.
    ///
    /// Cooldowns are untouched. Calling this while a turn is already in
    /// progress keeps the current turn.
    pub fn on_turn_start(&mut self) -> u32 {
        if self.phase == TurnPhase::InProgress {
            tracing::debug!(turn = self.turn, "turn already in progress");
            return self.turn;
        }
        self.turn += 1;
        self.phase = TurnPhase::InProgress;
        tracing::debug!(turn = self.turn, "turn started");
        self.turn
    }

    /// Ticks every cooldown across the whole roster once and closes the turn.
    pub fn on_turn_end(&mut self, roster: &mut HeroRoster) -> Result<u32, TurnError> {
        if self.phase == TurnPhase::Ended {
            tracing::warn!(turn = self.turn, "duplicate end of turn refused");
            return Err(TurnError::AlreadyEnded {
                turn: self.turn,
                context: ErrorContext::new(self.turn)
                    .with_message("cooldowns already ticked this turn"),
            });
        }

        roster.tick_cooldowns();
        self.phase = TurnPhase::Ended;
        tracing::debug!(turn = self.turn, heroes = roster.len(), "turn ended, cooldowns ticked");
        Ok(self.turn)
    }

    /// Back to the pre-battle state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
