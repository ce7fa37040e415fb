use crate::audit::{AuditResult, CompatibilityResolver, Resolution, Verdict};
use crate::error::Result;
use crate::modpack::ModEntry;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Record lookup failures as errored mods instead of aborting the run
    pub keep_going: bool,
    /// Worker threads issuing registry lookups
    pub jobs: usize,
    pub show_progress: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            keep_going: false,
            jobs: 1,
            show_progress: true,
        }
    }
}

/// Walks the manifest entries and aggregates verdicts into an [`AuditResult`]
pub struct AuditRunner {
    resolver: CompatibilityResolver,
    options: RunOptions,
}

impl AuditRunner {
    pub fn new(resolver: CompatibilityResolver, options: RunOptions) -> Self {
        Self { resolver, options }
    }

    pub fn run<'a, I>(&self, entries: I) -> Result<AuditResult>
    where
        I: IntoIterator<Item = &'a ModEntry>,
    {
        let active: Vec<&ModEntry> = entries
            .into_iter()
            .filter(|entry| !entry.is_disabled())
            .collect();

        let pb = self.progress_bar(active.len());
        let mut result = AuditResult::new();

        let outcome = if self.options.jobs > 1 && active.len() > 1 {
            self.run_parallel(&active, &pb, &mut result)
        } else {
            self.run_sequential(&active, &pb, &mut result)
        };
        pb.finish_and_clear();
        outcome?;

        info!(
            modcount = result.modcount,
            updatable = result.updatable,
            failed = result.failed_count(),
            errored = result.errored.len(),
            records_scanned = result.records_scanned,
            "Audit finished"
        );
        Ok(result)
    }

    fn run_sequential(
        &self,
        active: &[&ModEntry],
        pb: &ProgressBar,
        result: &mut AuditResult,
    ) -> Result<()> {
        for entry in active {
            pb.set_message(format!("Checking {}", entry.file_name()));
            let outcome = self.resolver.resolve(entry);
            self.accumulate(result, entry, outcome)?;
            pb.inc(1);
        }
        Ok(())
    }

    /// Bounded fan-out: workers pull entry indices and send verdicts back to
    /// this thread, which is the only one touching `result`.
    fn run_parallel(
        &self,
        active: &[&ModEntry],
        pb: &ProgressBar,
        result: &mut AuditResult,
    ) -> Result<()> {
        let workers = self.options.jobs.min(active.len());
        let next = AtomicUsize::new(0);
        let abort = AtomicBool::new(false);
        let (tx, rx) = mpsc::channel::<(usize, Result<Resolution>)>();

        thread::scope(|scope| {
            for _ in 0..workers {
                let tx = tx.clone();
                let next = &next;
                let abort = &abort;
                scope.spawn(move || {
                    while !abort.load(Ordering::Relaxed) {
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let Some(entry) = active.get(index) else {
                            break;
                        };
                        if tx.send((index, self.resolver.resolve(entry))).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(tx);

            let mut first_error = None;
            for (index, outcome) in rx {
                if first_error.is_some() {
                    continue;
                }
                let entry = active[index];
                pb.set_message(format!("Checked {}", entry.file_name()));
                if let Err(error) = self.accumulate(result, entry, outcome) {
                    abort.store(true, Ordering::Relaxed);
                    first_error = Some(error);
                }
                pb.inc(1);
            }

            match first_error {
                Some(error) => Err(error),
                None => Ok(()),
            }
        })
    }

    fn accumulate(
        &self,
        result: &mut AuditResult,
        entry: &ModEntry,
        outcome: Result<Resolution>,
    ) -> Result<()> {
        match outcome {
            Ok(resolution) => {
                result.records_scanned += resolution.records_scanned;
                match resolution.verdict {
                    Verdict::Updatable => result.record_updatable(),
                    Verdict::NotUpdatable => {
                        result.record_failed(entry.category(), resolution.title)
                    }
                }
            }
            Err(error) if self.options.keep_going => {
                warn!(path = %entry.path, %error, "Lookup failed, continuing");
                result.record_errored(entry.category(), entry.file_name(), error.to_string());
            }
            Err(error) => return Err(error),
        }
        Ok(())
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        let pb = ProgressBar::new(len as u64);
        if !self.options.show_progress {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  [{bar:40}] {pos}/{len} {msg}")
                .expect("valid progress template")
                .progress_chars("=>-"),
        );
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditConfig;
    use crate::error::AuditError;
    use crate::modpack::GameVersion;
    use crate::registry::Loader;
    use crate::registry::testing::{StaticRegistry, record};
    use std::collections::BTreeSet;
    use std::sync::Arc;

    fn entry(path: &str, id: &str) -> ModEntry {
        ModEntry {
            path: path.to_string(),
            downloads: vec![format!(
                "https://cdn.modrinth.com/data/{id}/versions/v1/file"
            )],
        }
    }

    fn quiet(keep_going: bool, jobs: usize) -> RunOptions {
        RunOptions {
            keep_going,
            jobs,
            show_progress: false,
        }
    }

    fn registry() -> Arc<StaticRegistry> {
        Arc::new(
            StaticRegistry::new()
                .with_project("sodium", "Sodium", &["1.20", "1.19"], &["fabric", "quilt"])
                .with_versions(
                    "sodium",
                    vec![
                        record(&["1.21"], &["fabric"]),
                        record(&["1.20"], &["fabric"]),
                        record(&["1.19"], &["fabric"]),
                    ],
                )
                .with_project("create", "Create", &["1.20", "1.19"], &["forge", "fabric"])
                .with_versions(
                    "create",
                    vec![record(&["1.20"], &["forge"]), record(&["1.19"], &["fabric"])],
                )
                .with_project("jei", "JEI", &["1.19"], &["forge", "fabric"])
                .with_project("faithful", "Faithful", &["1.20"], &["minecraft"])
                .with_project("bsl", "BSL Shaders", &["1.19"], &["iris"]),
        )
    }

    fn manifest() -> Vec<ModEntry> {
        vec![
            entry("mods/sodium.jar", "sodium"),
            entry("mods/create.jar", "create"),
            entry("mods/jei.jar", "jei"),
            entry("mods/legacy.jar.disabled", "sodium"),
            entry("resourcepacks/faithful.zip", "faithful"),
            entry("shaderpacks/bsl.zip", "bsl"),
        ]
    }

    fn run(
        registry: Arc<StaticRegistry>,
        config: &AuditConfig,
        options: RunOptions,
        entries: &[ModEntry],
    ) -> Result<AuditResult> {
        let resolver = CompatibilityResolver::new(registry, config);
        AuditRunner::new(resolver, options).run(entries)
    }

    fn failed_titles(result: &AuditResult) -> BTreeSet<String> {
        result.failed.values().flatten().cloned().collect()
    }

    #[test]
    fn fast_run_counts_and_groups_failures() {
        let config = AuditConfig::new("1.20", None, &GameVersion::parse("1.19"));
        let result = run(registry(), &config, quiet(false, 1), &manifest()).unwrap();

        assert_eq!(result.modcount, 5);
        assert_eq!(result.updatable, 3);
        assert_eq!(result.failed["mods"], vec!["JEI"]);
        assert_eq!(result.failed["shaderpacks"], vec!["BSL Shaders"]);
        assert_eq!(result.updatable + result.failed_count(), result.modcount);
    }

    #[test]
    fn comprehensive_run_checks_builds_for_primary_entries() {
        let config = AuditConfig::new("1.20", Some(Loader::Fabric), &GameVersion::parse("1.19"));
        let result = run(registry(), &config, quiet(false, 1), &manifest()).unwrap();

        assert_eq!(result.modcount, 5);
        // Create only has a forge build for 1.20
        assert_eq!(result.updatable, 2);
        assert_eq!(
            failed_titles(&result),
            ["BSL Shaders", "Create", "JEI"]
                .into_iter()
                .map(String::from)
                .collect::<BTreeSet<_>>()
        );
        assert_eq!(result.updatable + result.failed_count(), result.modcount);
    }

    #[test]
    fn disabled_entries_are_never_counted() {
        let entries = vec![
            entry("mods/sodium.jar.disabled", "sodium"),
            entry("mods/create.jar.disabled", "create"),
        ];
        let registry = registry();
        let config = AuditConfig::new("1.20", None, &GameVersion::parse("1.19"));
        let result = run(registry.clone(), &config, quiet(false, 1), &entries).unwrap();

        assert_eq!(result.modcount, 0);
        assert_eq!(result.updatable, 0);
        assert_eq!(registry.metadata_calls(), 0);
    }

    #[test]
    fn empty_manifest_reports_zero_ratio() {
        let config = AuditConfig::new("1.20", Some(Loader::Forge), &GameVersion::parse("1.19"));
        let result = run(registry(), &config, quiet(false, 1), &[]).unwrap();

        assert_eq!(result.modcount, 0);
        assert_eq!(result.updatable, 0);
        assert_eq!(format!("{:.2}%", result.update_ratio()), "0.00%");
    }

    #[test]
    fn base_version_direction_does_not_change_verdicts() {
        let upgrade = AuditConfig::new("1.20", Some(Loader::Fabric), &GameVersion::parse("1.19"));
        let downgrade =
            AuditConfig::new("1.20", Some(Loader::Fabric), &GameVersion::parse("1.21"));
        assert!(upgrade.reverse_search);
        assert!(!downgrade.reverse_search);

        let forward = run(registry(), &upgrade, quiet(false, 1), &manifest()).unwrap();
        let backward = run(registry(), &downgrade, quiet(false, 1), &manifest()).unwrap();

        assert_eq!(forward.updatable, backward.updatable);
        assert_eq!(failed_titles(&forward), failed_titles(&backward));
    }

    #[test]
    fn lookup_failure_aborts_by_default() {
        let mut entries = manifest();
        entries.insert(1, entry("mods/ghost.jar", "ghost"));
        let config = AuditConfig::new("1.20", None, &GameVersion::parse("1.19"));

        let err = run(registry(), &config, quiet(false, 1), &entries).unwrap_err();
        assert!(matches!(err, AuditError::Lookup { project, .. } if project == "ghost"));
    }

    #[test]
    fn keep_going_records_errored_mods_separately() {
        let mut entries = manifest();
        entries.push(entry("mods/ghost.jar", "ghost"));
        entries.push(ModEntry {
            path: "mods/local.jar".to_string(),
            downloads: vec!["https://example.com/local.jar".to_string()],
        });
        let config = AuditConfig::new("1.20", None, &GameVersion::parse("1.19"));

        let result = run(registry(), &config, quiet(true, 1), &entries).unwrap();

        assert_eq!(result.modcount, 7);
        assert_eq!(result.updatable, 3);
        assert_eq!(result.errored.len(), 2);
        assert_eq!(result.errored[0].name, "ghost.jar");
        assert!(!failed_titles(&result).contains("ghost.jar"));
        assert_eq!(
            result.updatable + result.failed_count() + result.errored.len(),
            result.modcount
        );
    }

    #[test]
    fn parallel_run_matches_sequential_run() {
        let config = AuditConfig::new("1.20", Some(Loader::Fabric), &GameVersion::parse("1.19"));
        let sequential = run(registry(), &config, quiet(false, 1), &manifest()).unwrap();
        let parallel = run(registry(), &config, quiet(false, 4), &manifest()).unwrap();

        assert_eq!(sequential.modcount, parallel.modcount);
        assert_eq!(sequential.updatable, parallel.updatable);
        assert_eq!(sequential.sorted_failures(), parallel.sorted_failures());
    }

    #[test]
    fn parallel_run_fails_fast() {
        let mut entries = manifest();
        entries.push(entry("mods/ghost.jar", "ghost"));
        let config = AuditConfig::new("1.20", None, &GameVersion::parse("1.19"));

        let err = run(registry(), &config, quiet(false, 3), &entries).unwrap_err();
        assert!(matches!(err, AuditError::Lookup { .. }));
    }
}
