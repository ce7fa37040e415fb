// Audit module - decides which modpack entries can move to a target game version
//
// - AuditConfig / SearchStrategy: what the run checks for
// - CompatibilityResolver: per-entry verdicts against the registry
// - AuditRunner: walks the manifest and aggregates an AuditResult
pub mod report;
pub mod resolver;
pub mod runner;

pub use report::AuditResult;
pub use resolver::{CompatibilityResolver, Resolution, Verdict};
pub use runner::{AuditRunner, RunOptions};

use crate::modpack::GameVersion;
use crate::registry::Loader;

/// How compatibility is decided for each entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Project-level game version membership only; one lookup per mod
    Fast,
    /// Loader-aware check that confirms a matching build exists
    Comprehensive { loader: Loader, reverse_search: bool },
}

/// Settings for one audit run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditConfig {
    pub target_version: String,
    pub loader: Option<Loader>,
    /// Scan version records oldest first
    pub reverse_search: bool,
}

impl AuditConfig {
    /// `reverse_search` is set when the pack's base version is older than the target.
    pub fn new(target_version: impl Into<String>, loader: Option<Loader>, base: &GameVersion) -> Self {
        let target_version = target_version.into();
        let reverse_search = base.is_older_than(&GameVersion::parse(&target_version));
        Self {
            target_version,
            loader,
            reverse_search,
        }
    }

    pub fn strategy(&self) -> SearchStrategy {
        match self.loader {
            Some(loader) => SearchStrategy::Comprehensive {
                loader,
                reverse_search: self.reverse_search,
            },
            None => SearchStrategy::Fast,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_search_follows_base_version() {
        let upgrade = AuditConfig::new("1.20", None, &GameVersion::parse("1.19"));
        assert!(upgrade.reverse_search);

        let downgrade = AuditConfig::new("1.20", None, &GameVersion::parse("1.21"));
        assert!(!downgrade.reverse_search);

        let same = AuditConfig::new("1.20.1", None, &GameVersion::parse("1.20.1"));
        assert!(!same.reverse_search);
    }

    #[test]
    fn loader_selects_comprehensive_strategy() {
        let base = GameVersion::parse("1.19.2");
        assert_eq!(
            AuditConfig::new("1.20.1", None, &base).strategy(),
            SearchStrategy::Fast
        );
        assert_eq!(
            AuditConfig::new("1.20.1", Some(Loader::Quilt), &base).strategy(),
            SearchStrategy::Comprehensive {
                loader: Loader::Quilt,
                reverse_search: true
            }
        );
    }
}
