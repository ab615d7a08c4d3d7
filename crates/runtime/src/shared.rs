//! Single-lock wrapper for hosts that touch the battle from several threads.
//!
//! Ledger, roster and targeting session are guarded together by one mutex, so
//! no two mutations can interleave.

use std::sync::{Arc, Mutex};

use battle_core::BattleCore;

use crate::error::{Result, RuntimeError};

/// Cloneable handle to a battle core shared across threads.
#[derive(Clone, Debug)]
pub struct SharedBattle {
    inner: Arc<Mutex<BattleCore>>,
}

impl SharedBattle {
    pub fn new(core: BattleCore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(core)),
        }
    }

    /// Runs `f` with exclusive access to the core.
    ///
    /// Event handlers fire inside `f` while the lock is held, so they must not
    /// call back into this handle.
    pub fn with<R>(&self, f: impl FnOnce(&mut BattleCore) -> R) -> Result<R> {
        let mut core = self.inner.lock().map_err(|_| RuntimeError::LockPoisoned)?;
        Ok(f(&mut core))
    }

    /// Like [`SharedBattle::with`] for operations that themselves fail.
    pub fn try_with<R, E>(
        &self,
        f: impl FnOnce(&mut BattleCore) -> std::result::Result<R, E>,
    ) -> Result<R>
    where
        RuntimeError: From<E>,
    {
        self.with(f)?.map_err(RuntimeError::from)
    }
}
