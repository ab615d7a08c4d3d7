//! Unified error types surfaced by the runtime API.
//!
//! Wraps core refusals and host-side failures (poisoned lock, missing tokio
//! runtime) so clients can bubble them up with consistent context.
use thiserror::Error;

use battle_core::{CastError, RosterError, SelectError, TurnError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Cast(#[from] CastError),

    #[error(transparent)]
    Select(#[from] SelectError),

    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error("battle state lock poisoned by a panicking holder")]
    LockPoisoned,

    #[error("effect tracking requires a tokio runtime")]
    NoAsyncRuntime(#[source] tokio::runtime::TryCurrentError),
}
