//! Host options read from the environment.
use std::env;

/// Runtime configuration for effect tracking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Capacity of the effect-completion channel.
    pub effect_channel_capacity: usize,
}

impl RuntimeConfig {
    pub const DEFAULT_EFFECT_CHANNEL_CAPACITY: usize = 64;

    /// Construct runtime configuration from environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_EFFECT_CHANNEL_CAPACITY` - completion channel capacity (default: 64, min: 1)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(capacity) = read_env::<usize>("BATTLE_EFFECT_CHANNEL_CAPACITY") {
            config.effect_channel_capacity = capacity.max(1);
        }

        config
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            effect_channel_capacity: Self::DEFAULT_EFFECT_CHANNEL_CAPACITY,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
