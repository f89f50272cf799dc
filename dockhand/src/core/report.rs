//! Rendering of execution results into the text report returned to callers.

use crate::core::classifier::{classify_errors, classify_output, render_lines};
use crate::core::operation::{Invocation, OperationDescriptor};
use crate::core::types::ExecutionOutcome;

/// What happened when an operation was dispatched.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationRun {
    /// Environment validation failed; nothing was executed.
    EnvironmentUnavailable { compose_file: String },
    Executed {
        invocation: Invocation,
        outcome: ExecutionOutcome,
    },
}

pub fn environment_failure_message(compose_file: &str) -> String {
    format!(
        "❌ Docker environment validation failed. Please ensure Docker is running and {compose_file} exists."
    )
}

/// Render the report for one dispatched operation.
pub fn render_report(descriptor: &OperationDescriptor, run: &OperationRun) -> String {
    let (invocation, outcome) = match run {
        OperationRun::EnvironmentUnavailable { compose_file } => {
            return environment_failure_message(compose_file);
        }
        OperationRun::Executed {
            invocation,
            outcome,
        } => (invocation, outcome),
    };

    if let ExecutionOutcome::SpawnFailed { error, .. } = outcome {
        return format!("❌ Error executing command: {error}");
    }

    let mut lines = vec![
        format!("🚀 {}", descriptor.description),
        format!("📋 Command: {invocation}"),
        format!("⏱️  Execution time: {:.2}s", outcome.duration_secs()),
        String::new(),
    ];

    match outcome {
        ExecutionOutcome::Completed {
            exit_code: 0,
            stdout,
            ..
        } => {
            lines.push("✅ Success!".to_string());
            push_section(&mut lines, "📄 Output:", &render_lines(&classify_output(stdout)));
        }
        ExecutionOutcome::Completed {
            exit_code,
            stdout,
            stderr,
            ..
        } => {
            lines.push(format!("❌ Failed with exit code {exit_code}"));
            push_section(
                &mut lines,
                "🔥 Error output:",
                &render_lines(&classify_errors(stderr)),
            );
            push_section(
                &mut lines,
                "📄 Standard output:",
                &render_lines(&classify_output(stdout)),
            );
        }
        ExecutionOutcome::TimedOut { timeout, .. } => {
            lines.push(format!(
                "⏰ Command timed out after {} seconds",
                timeout.as_secs()
            ));
        }
        ExecutionOutcome::SpawnFailed { .. } => {}
    }

    lines.join("\n")
}

fn push_section(lines: &mut Vec<String>, heading: &str, body: &str) {
    if body.is_empty() {
        return;
    }
    lines.push(heading.to_string());
    lines.push(body.to_string());
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;

    use super::*;
    use crate::core::operation::{Action, CatalogSettings, OperationCatalog};

    fn lint() -> OperationDescriptor {
        OperationCatalog::new(&CatalogSettings {
            default_timeout_secs: 300,
            ci_timeout_secs: 600,
            dev_service: "dev".to_string(),
        })
        .descriptor(Action::Lint)
        .clone()
    }

    fn executed(outcome: ExecutionOutcome) -> OperationRun {
        OperationRun::Executed {
            invocation: lint().invocation(&["docker-compose".to_string()]),
            outcome,
        }
    }

    fn completed(exit_code: i32, stdout: &str, stderr: &str) -> ExecutionOutcome {
        ExecutionOutcome::Completed {
            exit_code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            duration: Duration::from_millis(1234),
            started_at: Utc::now(),
        }
    }

    #[test]
    fn environment_failure_is_the_only_line() {
        let report = render_report(
            &lint(),
            &OperationRun::EnvironmentUnavailable {
                compose_file: "docker-compose.yml".to_string(),
            },
        );
        assert_eq!(report.lines().count(), 1);
        assert!(report.contains("Docker environment validation failed"));
        assert!(!report.contains("Command:"));
        assert!(!report.contains("Execution time"));
    }

    #[test]
    fn success_report_classifies_stdout_in_order() {
        let report = render_report(
            &lint(),
            &executed(completed(0, "Checking... 0 warnings\nAll checks passed", "")),
        );
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(
            lines,
            vec![
                "🚀 Running C++ linting checks...",
                "📋 Command: docker-compose run --rm lint",
                "⏱️  Execution time: 1.23s",
                "",
                "✅ Success!",
                "📄 Output:",
                "Checking... 0 warnings",
                "✅ All checks passed",
            ]
        );
        assert!(!report.contains("Error output"));
    }

    #[test]
    fn success_without_stdout_has_no_output_section() {
        let report = render_report(&lint(), &executed(completed(0, "", "noise")));
        assert!(report.ends_with("✅ Success!"));
    }

    #[test]
    fn failure_lists_stderr_before_stdout() {
        let report = render_report(
            &lint(),
            &executed(completed(2, "warning: unused\n", "main.cpp:1: error\n\n")),
        );
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(
            &lines[4..],
            &[
                "❌ Failed with exit code 2",
                "🔥 Error output:",
                "🔥 main.cpp:1: error",
                "📄 Standard output:",
                "🟡 warning: unused",
            ]
        );
    }

    #[test]
    fn failure_without_captures_only_has_banner() {
        let report = render_report(&lint(), &executed(completed(1, "", "")));
        assert!(report.ends_with("❌ Failed with exit code 1"));
    }

    #[test]
    fn timeout_names_bound_and_skips_classification() {
        let report = render_report(
            &lint(),
            &executed(ExecutionOutcome::TimedOut {
                timeout: Duration::from_secs(300),
                started_at: Utc::now(),
            }),
        );
        assert!(report.contains("⏱️  Execution time: 300.00s"));
        assert!(report.contains("timed out after 300 seconds"));
        assert!(!report.contains("Output:"));
        assert!(!report.contains("Success"));
    }

    #[test]
    fn spawn_failure_is_reported_as_text() {
        let report = render_report(
            &lint(),
            &executed(ExecutionOutcome::SpawnFailed {
                error: "spawn command: No such file or directory".to_string(),
                started_at: Utc::now(),
            }),
        );
        assert_eq!(
            report,
            "❌ Error executing command: spawn command: No such file or directory"
        );
    }
}
