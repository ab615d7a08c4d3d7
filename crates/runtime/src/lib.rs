//! Host-side runtime for the battle core.
//!
//! `battle-core` resolves casts synchronously and hands back effect futures it
//! never drives. This crate supplies the pieces a host needs around that:
//! - [`tracker`] spawns pending effects on tokio and collects completions
//! - [`shared`] guards the whole core behind a single mutex for
//!   multi-threaded hosts
//! - [`runtime`] ties both together and feeds completions back into the
//!   core's event bus
//! - [`config`] reads host options from the environment
pub mod config;
pub mod error;
pub mod runtime;
pub mod shared;
pub mod tracker;

pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use runtime::BattleRuntime;
pub use shared::SharedBattle;
pub use tracker::EffectTracker;
