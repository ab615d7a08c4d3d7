//! Battle configuration loader.

use std::path::Path;

use battle_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        let config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse battle config TOML: {}", e))?;

        if config.mana_cap > BattleConfig::MAX_MANA {
            tracing::warn!(
                requested = config.mana_cap,
                max = BattleConfig::MAX_MANA,
                "mana_cap above maximum, clamping"
            );
        }
        if config.mana_per_card == 0 {
            anyhow::bail!("mana_per_card must be at least 1");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::HotkeyOrigin;

    #[test]
    fn parses_partial_config_with_defaults() {
        let config = ConfigLoader::parse("mana_cap = 6\n").unwrap();

        assert_eq!(config.mana_cap, 6);
        assert_eq!(config.mana_per_card, BattleConfig::DEFAULT_MANA_PER_CARD);
        assert_eq!(config.hotkey_origin, HotkeyOrigin::OneBased);
    }

    #[test]
    fn parses_hotkey_origin() {
        let config = ConfigLoader::parse("hotkey_origin = \"zero_based\"\n").unwrap();
        assert_eq!(config.hotkey_origin, HotkeyOrigin::ZeroBased);
    }

    #[test]
    fn rejects_zero_mana_per_card() {
        let err = ConfigLoader::parse("mana_per_card = 0\n").unwrap_err();
        assert!(err.to_string().contains("mana_per_card"));
    }

    #[test]
    fn oversized_cap_is_clamped_by_config() {
        let config = ConfigLoader::parse("mana_cap = 50\n").unwrap();
        assert_eq!(config.effective_mana_cap(), BattleConfig::MAX_MANA);
    }
}
