use std::collections::BTreeMap;

/// A mod whose registry lookup failed while the run kept going
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErroredMod {
    pub category: String,
    pub name: String,
    pub reason: String,
}

/// Aggregate outcome of an audit run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditResult {
    /// Non-disabled entries considered
    pub modcount: usize,
    pub updatable: usize,
    /// Category (leading path segment) to titles without a compatible build
    pub failed: BTreeMap<String, Vec<String>>,
    pub errored: Vec<ErroredMod>,
    /// Version records inspected across all comprehensive checks
    pub records_scanned: usize,
}

impl AuditResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_updatable(&mut self) {
        self.modcount += 1;
        self.updatable += 1;
    }

    pub fn record_failed(&mut self, category: &str, title: String) {
        self.modcount += 1;
        self.failed
            .entry(category.to_string())
            .or_default()
            .push(title);
    }

    pub fn record_errored(&mut self, category: &str, name: &str, reason: String) {
        self.modcount += 1;
        self.errored.push(ErroredMod {
            category: category.to_string(),
            name: name.to_string(),
            reason,
        });
    }

    /// Percentage of counted mods that can be updated; 0 for an empty run
    pub fn update_ratio(&self) -> f64 {
        if self.modcount == 0 {
            0.0
        } else {
            self.updatable as f64 / self.modcount as f64 * 100.0
        }
    }

    pub fn failed_count(&self) -> usize {
        self.failed.values().map(Vec::len).sum()
    }

    pub fn failure_categories(&self) -> usize {
        self.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Failure groups with titles sorted for display
    pub fn sorted_failures(&self) -> Vec<(&str, Vec<&str>)> {
        self.failed
            .iter()
            .map(|(category, titles)| {
                let mut titles: Vec<&str> = titles.iter().map(String::as_str).collect();
                titles.sort_unstable();
                (category.as_str(), titles)
            })
            .collect()
    }
}
