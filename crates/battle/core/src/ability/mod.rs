//! Active abilities: the cast contract (cost, cooldown, eligibility) and the
//! effect procedures abilities run on resolution.

mod active;
mod effect;

pub use active::{ActiveAbility, CastEligibility, CastError, IneligibleReason};
pub use effect::{
    AbilityEffect, Cleave, EffectCompletion, EffectFuture, Execute, FnEffect, Strike,
};
