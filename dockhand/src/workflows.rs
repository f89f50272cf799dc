//! Validation of CI workflow files under `.github/workflows`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::core::workflow_lint::lint_workflow;

pub const WORKFLOWS_DIR: &str = ".github/workflows";

/// Validate one named workflow file, or every `*.yml`/`*.yaml` file.
#[instrument(skip(root))]
pub fn validate_workflow_yaml(root: &Path, workflow_file: Option<&str>) -> String {
    let mut lines = vec![
        "🔍 GitHub Actions YAML Validation".to_string(),
        "=".repeat(40),
        String::new(),
    ];

    let workflows_dir = root.join(WORKFLOWS_DIR);
    if !workflows_dir.is_dir() {
        lines.push(format!("❌ No {WORKFLOWS_DIR} directory found"));
        return lines.join("\n");
    }

    let files = match workflow_file {
        Some(name) => {
            let path = workflows_dir.join(name);
            if !path.is_file() {
                lines.push(format!("❌ Workflow file not found: {name}"));
                return lines.join("\n");
            }
            vec![path]
        }
        None => match list_workflow_files(&workflows_dir) {
            Ok(files) => files,
            Err(err) => {
                lines.push(format!("❌ Error validating workflow YAML: {err:#}"));
                return lines.join("\n");
            }
        },
    };

    if files.is_empty() {
        lines.push("ℹ️  No workflow files found".to_string());
        return lines.join("\n");
    }

    lines.push(format!("📋 Validating {} workflow file(s):", files.len()));
    lines.push(String::new());

    let mut all_valid = true;
    for path in &files {
        let (valid, file_lines) = check_file(path);
        all_valid &= valid;
        lines.extend(file_lines);
    }
    debug!(files = files.len(), all_valid, "workflow validation finished");

    lines.push(String::new());
    if all_valid {
        lines.push("🎉 All workflow files are valid!".to_string());
    } else {
        lines.push("⚠️  Some workflow files have issues that need attention".to_string());
    }
    lines.extend(
        [
            "",
            "💡 Helpful Commands:",
            "   - Check workflow runs: use the 'check_workflow_runs' tool",
            "   - GitHub CLI: gh workflow list",
            "   - GitHub CLI: gh run list --workflow <name>",
        ]
        .map(String::from),
    );
    lines.join("\n")
}

/// Returns whether the file is valid, plus its report lines.
fn check_file(path: &Path) -> (bool, Vec<String>) {
    let name = file_name(path);
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            return (
                false,
                vec![
                    format!("❌ {name}: Validation error"),
                    format!("   Error: {err}"),
                ],
            );
        }
    };
    match lint_workflow(&contents) {
        Ok(errors) if errors.is_empty() => (true, vec![format!("✅ {name}: Valid")]),
        Ok(errors) => {
            let mut lines = vec![format!("⚠️  {name}:")];
            lines.extend(errors.iter().map(|error| format!("   - {error}")));
            (false, lines)
        }
        Err(err) => (
            false,
            vec![
                format!("❌ {name}: YAML syntax error"),
                format!("   Error: {err}"),
            ],
        ),
    }
}

fn list_workflow_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let path = entry.context("read entry")?.path();
        let is_yaml = path
            .extension()
            .is_some_and(|ext| ext == "yml" || ext == "yaml");
        if is_yaml && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
