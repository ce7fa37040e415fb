use crate::audit::{AuditConfig, SearchStrategy};
use crate::error::Result;
use crate::modpack::ModEntry;
use crate::registry::{Loader, ModVersionRecord, RegistryClient};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Updatable,
    NotUpdatable,
}

/// Outcome of resolving a single manifest entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Registry display title
    pub title: String,
    pub verdict: Verdict,
    /// Version records inspected before the scan stopped
    pub records_scanned: usize,
}

/// Decides whether a manifest entry has a build for the target version
pub struct CompatibilityResolver {
    client: Arc<dyn RegistryClient>,
    strategy: SearchStrategy,
    target_version: String,
}

impl CompatibilityResolver {
    pub fn new(client: Arc<dyn RegistryClient>, config: &AuditConfig) -> Self {
        Self {
            client,
            strategy: config.strategy(),
            target_version: config.target_version.clone(),
        }
    }

    pub fn resolve(&self, entry: &ModEntry) -> Result<Resolution> {
        let project_id = entry.project_id()?;
        let metadata = self.client.fetch_metadata(&project_id)?;
        let target = self.target_version.as_str();

        let (updatable, records_scanned) = match self.strategy {
            SearchStrategy::Fast => (metadata.supports_version(target), 0),
            SearchStrategy::Comprehensive { .. } if !entry.is_primary() => {
                (metadata.supports_version(target), 0)
            }
            SearchStrategy::Comprehensive {
                loader,
                reverse_search,
            } => {
                if metadata.supports_loader(loader) && metadata.supports_version(target) {
                    // Project flags only say some build exists for each; confirm one has both.
                    let versions = self.client.fetch_versions(&project_id)?;
                    scan_versions(&versions, target, loader, reverse_search)
                } else {
                    (false, 0)
                }
            }
        };

        debug!(
            project_id = %project_id,
            title = %metadata.title,
            updatable,
            records_scanned,
            "Resolved"
        );

        Ok(Resolution {
            title: metadata.title,
            verdict: if updatable {
                Verdict::Updatable
            } else {
                Verdict::NotUpdatable
            },
            records_scanned,
        })
    }
}

/// First-match scan. Returns whether a compatible record exists and how many were inspected.
fn scan_versions(
    versions: &[ModVersionRecord],
    game_version: &str,
    loader: Loader,
    reverse: bool,
) -> (bool, usize) {
    let is_match = |record: &ModVersionRecord| record.is_compatible(game_version, loader);
    let position = if reverse {
        versions.iter().rev().position(is_match)
    } else {
        versions.iter().position(is_match)
    };

    match position {
        Some(index) => (true, index + 1),
        None => (false, versions.len()),
    }
}
