//! Battle-time orchestration: the targeting state machine, damage
//! composition, the turn cycle, and the [`BattleCore`] aggregate that owns
//! them together with the ledger and roster.
mod aggregate;
mod context;
mod damage;
mod input;
mod targeting;
mod turn;

pub use aggregate::{BattleCore, OrchestratorEvent};
pub use context::{BattleContext, Encounter, EnemyId, EnemyView};
pub use damage::{DamageComposer, DamageComposition, HeroContribution};
pub use input::{HotkeyError, InputEvent, InputOutcome, hotkey_index, hotkey_number_index};
pub use targeting::{
    CastId, CastReport, SelectError, SelectOutcome, TargetOutcome, TargetingMode,
    TargetingSession,
};
pub use turn::{TurnCycle, TurnError, TurnPhase};
