//! Tactical battle core: per-suit mana, hero abilities, targeting, and damage
//! composition.
//!
//! `battle-core` is pure logic. It owns no I/O and spawns nothing; hosts feed
//! it orchestrator notifications and input events, and observe it through the
//! synchronous [`EventBus`]. All mutable state for one battle lives in a
//! single [`BattleCore`], so there are no ambient globals.
pub mod ability;
pub mod battle;
pub mod card;
pub mod config;
pub mod error;
pub mod events;
pub mod hero;
pub mod mana;

pub use ability::{
    AbilityEffect, ActiveAbility, CastEligibility, CastError, Cleave, EffectCompletion,
    EffectFuture, Execute, FnEffect, IneligibleReason, Strike,
};
pub use battle::{
    BattleContext, BattleCore, CastId, CastReport, DamageComposer, DamageComposition, Encounter,
    EnemyId, EnemyView, HeroContribution, HotkeyError, InputEvent, InputOutcome,
    OrchestratorEvent, SelectError, SelectOutcome, TargetOutcome, TargetingMode, TargetingSession,
    TurnCycle, TurnError, TurnPhase,
};
pub use card::{Card, HandDescription, HandKind, Rank};
pub use config::{BattleConfig, HotkeyOrigin};
pub use error::{BattleError, ErrorContext, ErrorSeverity};
pub use events::{AbilityEligibility, BattleEvent, EventBus, EventHandler, SubscriptionId, Topic};
pub use hero::{
    AbilityRef, Finisher, HandKindBonus, Health, Hero, HeroError, HeroId, HeroRoster, LastStand,
    Passive, PassiveContext, PassiveMultiplier, RosterError, RosterSnapshot, SuitAffinity,
};
pub use mana::{LedgerError, ManaChange, ManaCost, ManaLedger, ManaSnapshot, Suit};
