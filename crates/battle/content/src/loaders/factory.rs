//! Content factory for assembling a battle from a data directory.

use std::path::{Path, PathBuf};

use battle_core::{BattleConfig, BattleCore, RosterSnapshot};

use crate::loaders::{ConfigLoader, HeroCatalog, HeroLoader, LoadResult, RosterStore};

/// Content factory that loads battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── battle.toml
/// └── heroes.ron
/// ```
///
/// Missing files fall back to the defaults shipped with the crate.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load battle configuration from `battle.toml`.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        let path = self.data_dir.join("battle.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no battle.toml, using defaults");
            return Ok(BattleConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the hero catalog from `heroes.ron`.
    pub fn load_heroes(&self) -> LoadResult<HeroCatalog> {
        let path = self.data_dir.join("heroes.ron");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no heroes.ron, using builtin catalog");
            return HeroCatalog::builtin();
        }
        HeroLoader::load(&path)
    }

    /// Builds a battle core for the party saved at `save`.
    pub fn load_battle(&self, save: &Path) -> LoadResult<BattleCore> {
        let config = self.load_config()?;
        let catalog = self.load_heroes()?;
        let snapshot = RosterStore::load(save)?;
        let roster = catalog.build_roster(&snapshot)?;
        Ok(BattleCore::with_config(config, roster))
    }

    /// Persists the current party composition of `core`.
    pub fn save_party(&self, core: &BattleCore, save: &Path) -> LoadResult<RosterSnapshot> {
        let snapshot = core.roster().snapshot();
        RosterStore::save(save, &snapshot)?;
        Ok(snapshot)
    }
}
