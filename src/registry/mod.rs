use crate::error::Result;
use clap::ValueEnum;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;

pub mod factory;
pub use factory::RegistryFactory;

/// Mod loaders accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Loader {
    Fabric,
    Forge,
    Neoforge,
    Quilt,
}

impl Loader {
    /// Identifier used by the registry in `loaders` arrays.
    pub fn as_str(&self) -> &'static str {
        match self {
            Loader::Fabric => "fabric",
            Loader::Forge => "forge",
            Loader::Neoforge => "neoforge",
            Loader::Quilt => "quilt",
        }
    }
}

impl fmt::Display for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Project-level description of a mod as published on the registry.
#[derive(Debug, Clone, Deserialize)]
pub struct ModMetadata {
    pub title: String,
    pub loaders: HashSet<String>,
    pub game_versions: HashSet<String>,
}

impl ModMetadata {
    pub fn supports_version(&self, game_version: &str) -> bool {
        self.game_versions.contains(game_version)
    }

    pub fn supports_loader(&self, loader: Loader) -> bool {
        self.loaders.contains(loader.as_str())
    }
}

/// One published build of a mod.
#[derive(Debug, Clone, Deserialize)]
pub struct ModVersionRecord {
    pub loaders: HashSet<String>,
    pub game_versions: HashSet<String>,
}

impl ModVersionRecord {
    /// A build qualifies when it targets both the game version and the loader.
    pub fn is_compatible(&self, game_version: &str, loader: Loader) -> bool {
        self.game_versions.contains(game_version) && self.loaders.contains(loader.as_str())
    }
}

/// Lookups against a mod registry. Every call is a single attempt with no caching.
pub trait RegistryClient: Send + Sync {
    fn fetch_metadata(&self, project_id: &str) -> Result<ModMetadata>;

    /// Version records, newest first as returned by the registry.
    fn fetch_versions(&self, project_id: &str) -> Result<Vec<ModVersionRecord>>;
}
