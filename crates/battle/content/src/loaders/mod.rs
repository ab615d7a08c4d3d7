//! Content loaders for reading battle data from files.
//!
//! Hero catalogs are RON, battle configuration is TOML, and roster saves are
//! RON or JSON depending on the file extension.

pub mod config;
pub mod factory;
pub mod heroes;
pub mod roster;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use heroes::{HeroCatalog, HeroLoader};
pub use roster::{RosterStore, SaveFormat};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
