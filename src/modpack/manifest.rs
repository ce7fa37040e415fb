use crate::error::{AuditError, Result};
use crate::modpack::version::GameVersion;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;
use url::Url;

/// Name of the index document inside an `.mrpack` archive.
pub const INDEX_FILE: &str = "modrinth.index.json";
pub const DISABLED_SUFFIX: &str = ".disabled";
pub const PRIMARY_CATEGORY: &str = "mods";

/// The parts of `modrinth.index.json` the audit needs
#[derive(Debug, Clone, Deserialize)]
pub struct ModpackIndex {
    pub dependencies: IndexDependencies,
    #[serde(default)]
    pub files: Vec<ModEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexDependencies {
    pub minecraft: String,
}

/// A file listed in the modpack index
#[derive(Debug, Clone, Deserialize)]
pub struct ModEntry {
    pub path: String,
    pub downloads: Vec<String>,
}

impl ModpackIndex {
    /// Read and parse the index from an `.mrpack` (zip) archive
    pub fn from_archive<P: AsRef<Path>>(archive_path: P) -> Result<Self> {
        let archive_path = archive_path.as_ref();
        debug!(path = %archive_path.display(), "Opening modpack archive");

        let file = File::open(archive_path).map_err(|e| {
            AuditError::Archive(format!("Cannot open '{}': {}", archive_path.display(), e))
        })?;

        let mut archive = zip::ZipArchive::new(file).map_err(|e| {
            AuditError::Archive(format!(
                "'{}' is not a readable zip archive: {}",
                archive_path.display(),
                e
            ))
        })?;

        let mut index = archive.by_name(INDEX_FILE).map_err(|_| {
            AuditError::Archive(format!(
                "'{}' does not contain {}",
                archive_path.display(),
                INDEX_FILE
            ))
        })?;

        let mut content = String::new();
        index
            .read_to_string(&mut content)
            .map_err(|e| AuditError::Archive(format!("Failed to read {}: {}", INDEX_FILE, e)))?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| AuditError::Manifest(format!("Failed to parse {}: {}", INDEX_FILE, e)))
    }

    /// Minecraft version the pack was built against
    pub fn base_version(&self) -> GameVersion {
        GameVersion::parse(&self.dependencies.minecraft)
    }

    pub fn active_entries(&self) -> impl Iterator<Item = &ModEntry> {
        self.files.iter().filter(|entry| !entry.is_disabled())
    }

    pub fn disabled_count(&self) -> usize {
        self.files.iter().filter(|entry| entry.is_disabled()).count()
    }
}

impl ModEntry {
    pub fn is_disabled(&self) -> bool {
        self.path.ends_with(DISABLED_SUFFIX)
    }

    /// Leading path segment, e.g. `mods` or `resourcepacks`
    pub fn category(&self) -> &str {
        self.path.split('/').next().unwrap_or_default()
    }

    pub fn is_primary(&self) -> bool {
        self.category() == PRIMARY_CATEGORY
    }

    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Registry project id taken from the first download URL
    ///
    /// CDN URLs have the shape `https://cdn.modrinth.com/data/<id>/versions/<version>/<file>`.
    pub fn project_id(&self) -> Result<String> {
        let locator = self
            .downloads
            .first()
            .ok_or_else(|| AuditError::InvalidLocator(format!("<none> for {}", self.path)))?;

        let url = Url::parse(locator).map_err(|_| AuditError::InvalidLocator(locator.clone()))?;
        let mut segments = url
            .path_segments()
            .ok_or_else(|| AuditError::InvalidLocator(locator.clone()))?;

        segments
            .by_ref()
            .find(|segment| *segment == "data")
            .and_then(|_| segments.next())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .ok_or_else(|| AuditError::InvalidLocator(locator.clone()))
    }
}
