use crate::audit::AuditResult;
use crate::error::Result;
use std::fs;
use std::path::Path;

pub const DEFAULT_EXPORT_FILE: &str = "failed_mods.txt";

/// Plain-text failure report: a capitalised header per category followed by
/// indented, sorted titles.
pub fn render_failure_report(result: &AuditResult) -> String {
    let mut out = String::new();
    for (category, titles) in result.sorted_failures() {
        out.push_str(&capitalize(category));
        out.push_str(":\n");
        for title in titles {
            out.push_str("  ");
            out.push_str(title);
            out.push('\n');
        }
    }
    out
}

pub fn write_failure_report<P: AsRef<Path>>(result: &AuditResult, path: P) -> Result<()> {
    fs::write(path, render_failure_report(result))?;
    Ok(())
}

/// First character upper-cased, the rest lower-cased
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn capitalizes_category_headers() {
        assert_eq!(capitalize("mods"), "Mods");
        assert_eq!(capitalize("resourcePacks"), "Resourcepacks");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn renders_grouped_sorted_report() {
        let mut result = AuditResult::new();
        result.record_failed("mods", "Zoomify".to_string());
        result.record_failed("shaderpacks", "BSL Shaders".to_string());
        result.record_failed("mods", "Applied Energistics 2".to_string());
        result.record_updatable();

        assert_eq!(
            render_failure_report(&result),
            "Mods:\n  Applied Energistics 2\n  Zoomify\nShaderpacks:\n  BSL Shaders\n"
        );
    }

    #[test]
    fn empty_result_renders_nothing() {
        assert_eq!(render_failure_report(&AuditResult::new()), "");
    }

    #[test]
    fn writes_report_to_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_FILE);
        let mut result = AuditResult::new();
        result.record_failed("mods", "Create".to_string());

        write_failure_report(&result, &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "Mods:\n  Create\n");
    }
}
