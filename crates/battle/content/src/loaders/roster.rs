//! Roster save files.
//!
//! Only party composition is persisted: hero ids in order plus the active
//! index. Mana, cooldowns, and targeting state never reach disk.

use std::path::Path;

use anyhow::Context;
use battle_core::{BattleConfig, RosterSnapshot};

use crate::loaders::{LoadResult, read_file};

/// On-disk encoding of a roster save.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveFormat {
    Ron,
    Json,
}

impl SaveFormat {
    /// Picks the format from the file extension (`.ron` or `.json`).
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("ron") => Ok(Self::Ron),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            _ => anyhow::bail!(
                "Unsupported roster save extension for {} (expected .ron or .json)",
                path.display()
            ),
        }
    }
}

/// Reads and writes [`RosterSnapshot`] files.
pub struct RosterStore;

impl RosterStore {
    pub fn save(path: &Path, snapshot: &RosterSnapshot) -> LoadResult<()> {
        let content = Self::encode(snapshot, SaveFormat::from_path(path)?)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write roster save {}", path.display()))?;
        tracing::debug!(path = %path.display(), heroes = snapshot.heroes.len(), "roster saved");
        Ok(())
    }

    pub fn load(path: &Path) -> LoadResult<RosterSnapshot> {
        let format = SaveFormat::from_path(path)?;
        let content = read_file(path)?;
        Self::decode(&content, format).with_context(|| format!("in {}", path.display()))
    }

    pub fn encode(snapshot: &RosterSnapshot, format: SaveFormat) -> LoadResult<String> {
        let content = match format {
            SaveFormat::Ron => {
                ron::ser::to_string_pretty(snapshot, ron::ser::PrettyConfig::default())
                    .map_err(|e| anyhow::anyhow!("Failed to encode roster RON: {}", e))?
            }
            SaveFormat::Json => serde_json::to_string_pretty(snapshot)
                .map_err(|e| anyhow::anyhow!("Failed to encode roster JSON: {}", e))?,
        };
        Ok(content)
    }

    /// Decodes and validates a save: party size within limits, no duplicate
    /// heroes, and an active index inside the party.
    pub fn decode(content: &str, format: SaveFormat) -> LoadResult<RosterSnapshot> {
        let snapshot: RosterSnapshot = match format {
            SaveFormat::Ron => ron::from_str(content)
                .map_err(|e| anyhow::anyhow!("Failed to parse roster RON: {}", e))?,
            SaveFormat::Json => serde_json::from_str(content)
                .map_err(|e| anyhow::anyhow!("Failed to parse roster JSON: {}", e))?,
        };

        if snapshot.heroes.len() > BattleConfig::MAX_PARTY_SIZE {
            anyhow::bail!(
                "roster save lists {} heroes (max {})",
                snapshot.heroes.len(),
                BattleConfig::MAX_PARTY_SIZE
            );
        }
        for (i, id) in snapshot.heroes.iter().enumerate() {
            if snapshot.heroes[..i].contains(id) {
                anyhow::bail!("roster save lists {} twice", id);
            }
        }
        if !snapshot.heroes.is_empty() && snapshot.active >= snapshot.heroes.len() {
            anyhow::bail!(
                "active index {} out of range for party of {}",
                snapshot.active,
                snapshot.heroes.len()
            );
        }

        Ok(snapshot)
    }
}
