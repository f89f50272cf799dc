//! CI workflow status probe backed by the hosting CLI.
//!
//! Independent of the container environment: it never runs the environment
//! validator. Every failure ends in guidance text rather than an error.

use tracing::{debug, instrument, warn};

use crate::core::run_status::parse_runs;
use crate::io::gh::HostingCli;
use crate::io::process::is_not_found;

pub const NO_RUNS_MESSAGE: &str = "ℹ️  No workflow runs found";

/// Query recent workflow runs and render them as a report.
#[instrument(skip(cli))]
pub fn check_workflow_runs<H: HostingCli>(cli: &H, limit: u32, workflow: Option<&str>) -> String {
    let mut lines = vec![
        "🔍 GitHub Actions Workflow Status".to_string(),
        "=".repeat(40),
        String::new(),
    ];

    if let Err(guidance) = ensure_authenticated(cli) {
        lines.extend(guidance);
        return lines.join("\n");
    }

    let output = match cli.run_list(limit, workflow) {
        Ok(output) => output,
        Err(err) if is_not_found(&err) => {
            lines.extend(
                [
                    "❌ GitHub CLI (gh) not found",
                    "💡 Install GitHub CLI: https://cli.github.com/",
                    "",
                    "🔧 Alternative: Check workflows manually",
                    "   Visit the repository's Actions tab",
                ]
                .map(String::from),
            );
            return lines.join("\n");
        }
        Err(err) => {
            warn!(err = %format!("{err:#}"), "run list failed to execute");
            lines.push(format!("❌ Error checking workflow runs: {err:#}"));
            return lines.join("\n");
        }
    };

    if !output.success {
        if output.stderr.contains("not found") || output.stderr.contains("No workflows found") {
            lines.push(NO_RUNS_MESSAGE.to_string());
            lines.push("💡 Check if this repository has GitHub Actions enabled".to_string());
        } else {
            lines.push(format!(
                "❌ Error getting workflow runs: {}",
                output.stderr.trim()
            ));
        }
        return lines.join("\n");
    }

    let runs = match parse_runs(&output.stdout) {
        Ok(runs) => runs,
        Err(err) => {
            warn!(err = %err, "unparseable run list");
            lines.push(format!("❌ Error parsing workflow runs: {err}"));
            return lines.join("\n");
        }
    };
    debug!(count = runs.len(), "workflow runs parsed");

    if runs.is_empty() {
        lines.push(NO_RUNS_MESSAGE.to_string());
        return lines.join("\n");
    }

    lines.push(format!("📊 Latest {} Workflow Runs:", runs.len()));
    lines.push(String::new());
    for run in &runs {
        lines.extend(run.render());
        lines.push(String::new());
    }
    lines.join("\n")
}

/// `Err` carries the guidance lines to show instead of run data.
fn ensure_authenticated<H: HostingCli>(cli: &H) -> Result<(), Vec<String>> {
    match cli.version() {
        Ok(output) if output.success => {}
        Ok(_) | Err(_) => {
            return Err([
                "❌ GitHub CLI not found",
                "💡 Install GitHub CLI: https://cli.github.com/",
                "📚 Then authenticate with: gh auth login",
            ]
            .map(String::from)
            .to_vec());
        }
    }

    let output = match cli.auth_status() {
        Ok(output) => output,
        Err(err) => {
            return Err(vec![
                format!("❌ Error checking GitHub auth: {err:#}"),
                "💡 Run: gh auth login".to_string(),
            ]);
        }
    };
    if output.success {
        return Ok(());
    }

    let mut guidance = vec![
        "❌ GitHub CLI not authenticated".to_string(),
        "🔧 Setup:".to_string(),
    ];
    if cli.token_in_env() {
        guidance.push("  1. GITHUB_TOKEN found in environment".to_string());
        guidance.push("  2. Run: echo $GITHUB_TOKEN | gh auth login --with-token".to_string());
    } else {
        guidance.push("  1. Set the GITHUB_TOKEN (or GH_TOKEN) environment variable".to_string());
        guidance.push("  2. Or run: gh auth login".to_string());
    }
    guidance.extend(
        [
            "",
            "🔑 Token requirements for private repos:",
            "  - repo (full control of private repositories)",
            "  - workflow (update GitHub Action workflows)",
            "  - read:org (read org and team membership)",
        ]
        .map(String::from),
    );
    Err(guidance)
}
