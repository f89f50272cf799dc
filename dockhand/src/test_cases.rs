//! Validation of the `test_cases/` fixture directory.
//!
//! Each YAML fixture must parse and should have a JSON counterpart with the
//! same stem.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::instrument;

pub const TEST_CASES_DIR: &str = "test_cases";

#[instrument(skip_all)]
pub fn validate_test_structure(root: &Path) -> String {
    let dir = root.join(TEST_CASES_DIR);
    if !dir.is_dir() {
        return format!("❌ {TEST_CASES_DIR}/ directory not found");
    }
    match render(&dir) {
        Ok(report) => report,
        Err(err) => format!("❌ Error validating test structure: {err:#}"),
    }
}

fn render(dir: &Path) -> Result<String> {
    let yaml_files = files_with_extension(dir, "yaml")?;
    let json_files = files_with_extension(dir, "json")?;

    let mut lines = vec![
        "🔍 Test Structure Validation".to_string(),
        format!("📁 Directory: {}", dir.display()),
        format!("📄 YAML files: {}", yaml_files.len()),
        format!("📄 JSON files: {}", json_files.len()),
        String::new(),
    ];

    let mut valid = Vec::new();
    let mut invalid = Vec::new();
    for path in &yaml_files {
        match parse_yaml(path) {
            Ok(()) => valid.push(file_name(path)),
            Err(err) => invalid.push(format!("{}: {err:#}", file_name(path))),
        }
    }
    push_list(&mut lines, "✅ Valid YAML files", &valid);
    push_list(&mut lines, "❌ Invalid YAML files", &invalid);

    let missing_json: Vec<String> = yaml_files
        .iter()
        .filter(|path| !path.with_extension("json").exists())
        .map(|path| file_name(path))
        .collect();
    push_list(
        &mut lines,
        "⚠️  YAML files without JSON counterparts",
        &missing_json,
    );

    Ok(lines.join("\n"))
}

fn parse_yaml(path: &Path) -> Result<()> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_yaml::from_str::<serde_yaml::Value>(&contents).context("parse yaml")?;
    Ok(())
}

fn push_list(lines: &mut Vec<String>, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(format!("{heading} ({}):", items.len()));
    lines.extend(items.iter().map(|item| format!("  • {item}")));
}

fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let path = entry.context("read entry")?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ProjectDir;

    #[test]
    fn missing_directory_is_reported() {
        let project = ProjectDir::new().expect("project");
        assert_eq!(
            validate_test_structure(project.root()),
            "❌ test_cases/ directory not found"
        );
    }

    #[test]
    fn reports_counts_invalid_yaml_and_missing_json() {
        let project = ProjectDir::new().expect("project");
        project
            .write("test_cases/add.yaml", "input: [1, 2]\nexpected: 3\n")
            .expect("write");
        project
            .write("test_cases/add.json", "{}")
            .expect("write");
        project
            .write("test_cases/broken.yaml", "input: [1, 2\n")
            .expect("write");
        project
            .write("test_cases/sub.yaml", "input: [3, 1]\n")
            .expect("write");

        let report = validate_test_structure(project.root());
        assert!(report.contains("📄 YAML files: 3"));
        assert!(report.contains("📄 JSON files: 1"));
        assert!(report.contains("✅ Valid YAML files (2):\n  • add.yaml\n  • sub.yaml"));
        assert!(report.contains("❌ Invalid YAML files (1):\n  • broken.yaml: parse yaml"));
        assert!(report.contains(
            "⚠️  YAML files without JSON counterparts (2):\n  • broken.yaml\n  • sub.yaml"
        ));
    }

    #[test]
    fn complete_fixtures_have_no_warnings() {
        let project = ProjectDir::new().expect("project");
        project
            .write("test_cases/a.yaml", "x: 1\n")
            .expect("write");
        project.write("test_cases/a.json", "{}").expect("write");

        let report = validate_test_structure(project.root());
        assert!(!report.contains("Invalid"));
        assert!(!report.contains("without JSON"));
    }
}
