//! Effect procedures run when an ability resolves.
//!
//! An effect may finish immediately or hand back a future that represents a
//! multi-step resolution (animations, delayed hits). The economy does not wait
//! for it: mana is debited and the cooldown started before the effect is even
//! invoked, so a pending effect only delays presentation.

use core::fmt;
use core::future::Future;
use core::pin::Pin;
use std::sync::Arc;

use crate::battle::{BattleContext, EnemyId};

/// Boxed future of an effect still in flight.
pub type EffectFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Completion signal returned by an effect procedure.
#[derive(Default)]
pub enum EffectCompletion {
    /// The effect finished synchronously.
    #[default]
    Immediate,
    /// The effect continues asynchronously; the host decides how to drive it.
    Pending(EffectFuture),
}

impl EffectCompletion {
    pub fn pending(future: impl Future<Output = ()> + Send + 'static) -> Self {
        Self::Pending(Box::pin(future))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

impl fmt::Debug for EffectCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Immediate => f.write_str("Immediate"),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// The procedure an ability runs against its validated target.
pub trait AbilityEffect: fmt::Debug + Send + Sync {
    fn apply(&self, target: EnemyId, ctx: &mut dyn BattleContext) -> EffectCompletion;
}

type EffectFn = dyn Fn(EnemyId, &mut dyn BattleContext) -> EffectCompletion + Send + Sync;

/// Adapter turning a closure into an [`AbilityEffect`].
#[derive(Clone)]
pub struct FnEffect {
    label: &'static str,
    f: Arc<EffectFn>,
}

impl FnEffect {
    pub fn new<F>(label: &'static str, f: F) -> Self
    where
        F: Fn(EnemyId, &mut dyn BattleContext) -> EffectCompletion + Send + Sync + 'static,
    {
        Self {
            label,
            f: Arc::new(f),
        }
    }
}

impl fmt::Debug for FnEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnEffect").field("label", &self.label).finish()
    }
}

impl AbilityEffect for FnEffect {
    fn apply(&self, target: EnemyId, ctx: &mut dyn BattleContext) -> EffectCompletion {
        (self.f)(target, ctx)
    }
}

/// Deals flat damage to the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strike {
    pub damage: u32,
}

impl AbilityEffect for Strike {
    fn apply(&self, target: EnemyId, ctx: &mut dyn BattleContext) -> EffectCompletion {
        let dealt = ctx.damage_enemy(target, self.damage);
        tracing::debug!(%target, dealt, "strike resolved");
        EffectCompletion::Immediate
    }
}

/// Deals damage, multiplied when the target is already badly hurt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Execute {
    pub damage: u32,
    /// Health percentage at or below which the bonus applies.
    pub threshold_percent: u32,
    pub bonus_multiplier: f64,
}

impl AbilityEffect for Execute {
    fn apply(&self, target: EnemyId, ctx: &mut dyn BattleContext) -> EffectCompletion {
        let Some(enemy) = ctx.enemy(target) else {
            return EffectCompletion::Immediate;
        };
        let amount = if enemy.health_percent() <= self.threshold_percent {
            (f64::from(self.damage) * self.bonus_multiplier.max(0.0)).floor() as u32
        } else {
            self.damage
        };
        let dealt = ctx.damage_enemy(target, amount);
        tracing::debug!(%target, dealt, "execute resolved");
        EffectCompletion::Immediate
    }
}

/// Deals damage to every living enemy; the chosen target only anchors the cast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cleave {
    pub damage: u32,
}

impl AbilityEffect for Cleave {
    fn apply(&self, _target: EnemyId, ctx: &mut dyn BattleContext) -> EffectCompletion {
        let living: Vec<_> = ctx
            .enemies()
            .into_iter()
            .filter(|enemy| enemy.is_alive())
            .map(|enemy| enemy.id)
            .collect();
        let dealt: u32 = living
            .into_iter()
            .map(|id| ctx.damage_enemy(id, self.damage))
            .sum();
        tracing::debug!(dealt, "cleave resolved");
        EffectCompletion::Immediate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::{Encounter, EnemyView};

    fn encounter() -> Encounter {
        Encounter::new([
            EnemyView::new(EnemyId(1), 100),
            EnemyView::new(EnemyId(2), 100),
            EnemyView {
                id: EnemyId(3),
                current_health: 0,
                max_health: 100,
            },
        ])
    }

    #[test]
    fn strike_hits_only_target() {
        let mut ctx = encounter();
        Strike { damage: 30 }.apply(EnemyId(2), &mut ctx);
        assert_eq!(ctx.enemy(EnemyId(1)).unwrap().current_health, 100);
        assert_eq!(ctx.enemy(EnemyId(2)).unwrap().current_health, 70);
    }

    #[test]
    fn execute_bonus_applies_below_threshold() {
        let mut ctx = encounter();
        let execute = Execute {
            damage: 20,
            threshold_percent: 50,
            bonus_multiplier: 2.0,
        };

        execute.apply(EnemyId(1), &mut ctx);
        assert_eq!(ctx.enemy(EnemyId(1)).unwrap().current_health, 80);

        ctx.damage_enemy(EnemyId(1), 40);
        execute.apply(EnemyId(1), &mut ctx);
        assert_eq!(ctx.enemy(EnemyId(1)).unwrap().current_health, 0);
    }

    #[test]
    fn cleave_skips_dead_enemies() {
        let mut ctx = encounter();
        Cleave { damage: 10 }.apply(EnemyId(1), &mut ctx);
        let health: Vec<_> = ctx.enemies().iter().map(|e| e.current_health).collect();
        assert_eq!(health, vec![90, 90, 0]);
    }

    #[test]
    fn fn_effect_can_defer_completion() {
        let effect = FnEffect::new("delayed", |target, ctx| {
            ctx.damage_enemy(target, 5);
            EffectCompletion::pending(async {})
        });
        let mut ctx = encounter();

        let completion = effect.apply(EnemyId(1), &mut ctx);

        assert!(completion.is_pending());
        assert_eq!(ctx.enemy(EnemyId(1)).unwrap().current_health, 95);
        assert_eq!(format!("{effect:?}"), "FnEffect { label: \"delayed\" }");
    }
}
