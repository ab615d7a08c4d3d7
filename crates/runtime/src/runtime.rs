//! Host-side battle runtime.
//!
//! Couples a [`SharedBattle`] with an [`EffectTracker`]: casts resolve
//! synchronously under the battle lock, pending effects are spawned onto
//! tokio, and completions are fed back into the core's event bus as
//! `EffectCompleted`.

use battle_core::{BattleContext, BattleCore, EnemyId, InputEvent, InputOutcome, TargetOutcome};

use crate::config::RuntimeConfig;
use crate::error::Result;
use crate::shared::SharedBattle;
use crate::tracker::EffectTracker;

#[derive(Debug)]
pub struct BattleRuntime {
    battle: SharedBattle,
    tracker: EffectTracker,
}

impl BattleRuntime {
    /// Must be called from within a tokio runtime.
    pub fn new(core: BattleCore, config: RuntimeConfig) -> Result<Self> {
        Ok(Self {
            battle: SharedBattle::new(core),
            tracker: EffectTracker::new(&config)?,
        })
    }

    /// Cloneable handle to the battle state for other threads.
    pub fn battle(&self) -> SharedBattle {
        self.battle.clone()
    }

    pub fn in_flight(&self) -> usize {
        self.tracker.in_flight()
    }

    /// Resolves a target click. A pending effect is moved into the tracker, so
    /// the returned report always carries an immediate completion.
    pub fn choose_target(
        &mut self,
        target: Option<EnemyId>,
        ctx: &mut dyn BattleContext,
    ) -> Result<TargetOutcome> {
        let mut outcome = self.battle.with(|core| core.choose_target(target, ctx))?;
        if let TargetOutcome::Handled(report) = &mut outcome {
            let completion = std::mem::take(&mut report.completion);
            self.tracker.track(report.id, completion);
        }
        Ok(outcome)
    }

    /// Input routing with effect tracking for target clicks.
    pub fn handle_input(
        &mut self,
        input: InputEvent,
        ctx: &mut dyn BattleContext,
    ) -> Result<InputOutcome> {
        let InputEvent::TargetClicked(target) = input else {
            return self.battle.with(|core| core.handle_input(input, ctx));
        };

        Ok(match self.choose_target(target, ctx)? {
            TargetOutcome::Handled(_) => InputOutcome::Handled,
            TargetOutcome::Aborted(err) => InputOutcome::Rejected(
                err.reason()
                    .map_or_else(|| err.to_string(), |reason| reason.to_string()),
            ),
            TargetOutcome::NotTargeting | TargetOutcome::Ignored => InputOutcome::Unhandled,
        })
    }

    /// Publishes every completion reported so far. Returns how many.
    pub fn pump(&mut self) -> Result<usize> {
        let completed = self.tracker.drain_completions();
        if completed.is_empty() {
            return Ok(0);
        }
        self.battle.with(|core| {
            for &cast in &completed {
                core.complete_effect(cast);
            }
        })?;
        Ok(completed.len())
    }

    /// Waits until every tracked effect has completed, publishing each one.
    ///
    /// Never returns while an effect that never completes is in flight. A
    /// panicked effect counts as completed.
    pub async fn settle(&mut self) -> Result<usize> {
        let mut settled = 0;
        while let Some(cast) = self.tracker.next_completion().await {
            self.battle.with(|core| core.complete_effect(cast))?;
            settled += 1;
        }
        tracing::debug!(settled, "all tracked effects completed");
        Ok(settled)
    }
}
