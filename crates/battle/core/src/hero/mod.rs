//! Heroes, their passives, and the party roster.
//!
//! - **Hero**: owns up to [`crate::BattleConfig::MAX_ABILITIES_PER_HERO`]
//!   active abilities and any number of passives
//! - **Passive**: conditional damage multiplier evaluated per played hand
//! - **HeroRoster**: ordered party with a fixed maximum size

mod member;
mod passive;
mod roster;

pub use member::{Health, Hero, HeroAbilities, HeroError, HeroId};
pub use passive::{
    Finisher, HandKindBonus, LastStand, Passive, PassiveContext, PassiveMultiplier, SuitAffinity,
};
pub use roster::{AbilityRef, HeroRoster, RosterError, RosterSnapshot};
