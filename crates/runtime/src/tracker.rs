//! Fire-and-track of asynchronous ability effects.
//!
//! A resolved cast is economically final before its effect runs. Pending
//! effects are spawned onto tokio and report back through a bounded channel;
//! the host drains completions whenever it refreshes presentation.
//!
//! There is no timeout: an effect that never finishes never reports, and its
//! cast simply stays in flight. An effect that panics is logged and reported
//! as completed, so it never holds up [`EffectTracker::next_completion`].

use std::collections::HashSet;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use battle_core::{CastId, EffectCompletion};

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};

#[derive(Debug)]
pub struct EffectTracker {
    handle: Handle,
    completion_tx: mpsc::Sender<CastId>,
    completion_rx: mpsc::Receiver<CastId>,
    in_flight: HashSet<CastId>,
}

impl EffectTracker {
    /// Binds the tracker to the tokio runtime of the calling context.
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        let handle = Handle::try_current().map_err(RuntimeError::NoAsyncRuntime)?;
        Ok(Self::with_handle(handle, config))
    }

    pub fn with_handle(handle: Handle, config: &RuntimeConfig) -> Self {
        let (completion_tx, completion_rx) = mpsc::channel(config.effect_channel_capacity.max(1));
        Self {
            handle,
            completion_tx,
            completion_rx,
            in_flight: HashSet::new(),
        }
    }

    /// Spawns a pending effect. Returns false for effects that already finished.
    pub fn track(&mut self, cast: CastId, completion: EffectCompletion) -> bool {
        let EffectCompletion::Pending(effect) = completion else {
            return false;
        };

        let tx = self.completion_tx.clone();
        let task = self.handle.spawn(effect);
        self.handle.spawn(async move {
            if let Err(err) = task.await {
                tracing::warn!(%cast, %err, "effect task failed");
            }
            if tx.send(cast).await.is_err() {
                tracing::trace!(%cast, "effect finished after tracker was dropped");
            }
        });
        self.in_flight.insert(cast);
        tracing::debug!(%cast, in_flight = self.in_flight.len(), "tracking pending effect");
        true
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_in_flight(&self, cast: CastId) -> bool {
        self.in_flight.contains(&cast)
    }

    /// Collects every completion reported so far without waiting.
    pub fn drain_completions(&mut self) -> Vec<CastId> {
        let mut completed = Vec::new();
        while let Ok(cast) = self.completion_rx.try_recv() {
            self.in_flight.remove(&cast);
            completed.push(cast);
        }
        completed
    }

    /// Waits for the next completion. Returns `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<CastId> {
        if self.in_flight.is_empty() {
            return None;
        }
        let cast = self.completion_rx.recv().await?;
        self.in_flight.remove(&cast);
        Some(cast)
    }
}
