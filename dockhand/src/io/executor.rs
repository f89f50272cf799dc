//! Executor abstraction for running resolved invocations.
//!
//! The [`CommandExecutor`] trait decouples dispatch from process spawning.
//! Tests use scripted executors that return predetermined outcomes.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::core::operation::Invocation;
use crate::core::types::ExecutionOutcome;
use crate::io::process::{command_from_argv, run_command_with_timeout};

/// Runs one invocation to a terminal outcome.
pub trait CommandExecutor {
    /// Never fails: spawn problems are reported as `SpawnFailed`.
    fn execute(&self, invocation: &Invocation, timeout: Duration) -> ExecutionOutcome;
}

/// Executor that spawns the invocation as a child of the project root.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    workdir: PathBuf,
    output_limit_bytes: usize,
}

impl ProcessExecutor {
    pub fn new(workdir: impl Into<PathBuf>, output_limit_bytes: usize) -> Self {
        Self {
            workdir: workdir.into(),
            output_limit_bytes,
        }
    }
}

impl CommandExecutor for ProcessExecutor {
    #[instrument(skip_all, fields(command = %invocation, timeout_secs = timeout.as_secs()))]
    fn execute(&self, invocation: &Invocation, timeout: Duration) -> ExecutionOutcome {
        let started_at = Utc::now();
        let cmd = match command_from_argv(&invocation.argv, &self.workdir) {
            Ok(cmd) => cmd,
            Err(err) => {
                return ExecutionOutcome::SpawnFailed {
                    error: format!("{err:#}"),
                    started_at,
                };
            }
        };

        info!(workdir = %self.workdir.display(), "starting command");
        let start = Instant::now();
        let output = match run_command_with_timeout(cmd, timeout, self.output_limit_bytes) {
            Ok(output) => output,
            Err(err) => {
                warn!(err = %format!("{err:#}"), "command could not run");
                return ExecutionOutcome::SpawnFailed {
                    error: format!("{err:#}"),
                    started_at,
                };
            }
        };
        let duration = start.elapsed();

        if output.timed_out {
            warn!(timeout_secs = timeout.as_secs(), "command timed out");
            return ExecutionOutcome::TimedOut {
                timeout,
                started_at,
            };
        }

        let exit_code = output.exit_code();
        if exit_code == 0 {
            debug!(duration = ?duration, "command succeeded");
        } else {
            warn!(exit_code, "command failed");
        }
        ExecutionOutcome::Completed {
            exit_code,
            stdout: output.stdout_lossy(),
            stderr: output.stderr_lossy(),
            duration,
            started_at,
        }
    }
}
