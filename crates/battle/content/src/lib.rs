//! Data-driven battle content and roster persistence.
//!
//! This crate provides loaders for RON/TOML data files:
//! - Hero catalogs: abilities, costs, effects, and passives (RON)
//! - Battle configuration (TOML)
//! - Roster saves: party composition only (RON or JSON)
//!
//! Content is resolved into battle-core types and never appears in battle
//! state.

pub mod specs;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use specs::{AbilitySpec, ConditionSpec, EffectSpec, HeroSpec, PassiveSpec};

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, HeroCatalog, HeroLoader, LoadResult, RosterStore, SaveFormat,
};
