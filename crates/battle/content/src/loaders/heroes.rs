//! Hero catalog loader.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use battle_core::{Hero, HeroId, HeroRoster, RosterSnapshot};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};
use crate::specs::HeroSpec;

const BUILTIN_HEROES: &str = include_str!("../../data/heroes.ron");

/// Hero catalog structure for RON files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeroCatalog {
    pub heroes: Vec<HeroSpec>,
}

impl HeroCatalog {
    /// The catalog shipped with the crate.
    pub fn builtin() -> LoadResult<Self> {
        Self::parse(BUILTIN_HEROES).context("builtin hero catalog is invalid")
    }

    /// Parses and validates a catalog: ids must be unique and every hero must
    /// build.
    pub fn parse(content: &str) -> LoadResult<Self> {
        let catalog: HeroCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse hero catalog RON: {}", e))?;

        let mut seen = HashSet::new();
        for spec in &catalog.heroes {
            if !seen.insert(spec.id) {
                anyhow::bail!("duplicate hero id {} ('{}')", spec.id, spec.name);
            }
            spec.build()
                .map_err(|e| anyhow::anyhow!("Invalid hero '{}': {}", spec.name, e))?;
        }

        tracing::debug!(heroes = catalog.heroes.len(), "hero catalog loaded");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.heroes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty()
    }

    pub fn spec(&self, id: HeroId) -> Option<&HeroSpec> {
        self.heroes.iter().find(|spec| spec.hero_id() == id)
    }

    /// Builds a fresh hero from its catalog entry.
    pub fn hero(&self, id: HeroId) -> Option<Hero> {
        self.spec(id)?.build().ok()
    }

    /// Rebuilds a party from a saved snapshot.
    pub fn build_roster(&self, snapshot: &RosterSnapshot) -> LoadResult<HeroRoster> {
        HeroRoster::from_snapshot(snapshot, |id| self.hero(id))
            .map_err(|e| anyhow::anyhow!("Failed to rebuild roster: {}", e))
    }
}

/// Loader for hero catalogs from RON files.
pub struct HeroLoader;

impl HeroLoader {
    pub fn load(path: &Path) -> LoadResult<HeroCatalog> {
        let content = read_file(path)?;
        HeroCatalog::parse(&content).with_context(|| format!("in {}", path.display()))
    }
}
