//! Container environment validation performed before every execution.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::io::config::DockhandConfig;
use crate::io::process::{command_from_argv, run_command_with_timeout};

/// Output kept from the liveness probe; its content is never inspected.
const PROBE_OUTPUT_LIMIT_BYTES: usize = 16 * 1024;

/// Gate that decides whether the container runtime is usable.
pub trait EnvironmentCheck {
    /// Never fails: every problem collapses to `false`.
    fn validate(&self) -> bool;
}

/// Checks the compose file exists and the container engine answers a probe.
#[derive(Debug, Clone)]
pub struct ComposeEnvironment {
    root: PathBuf,
    compose_file: String,
    probe_argv: Vec<String>,
    probe_timeout: Duration,
}

impl ComposeEnvironment {
    pub fn new(root: impl Into<PathBuf>, config: &DockhandConfig) -> Self {
        let mut probe_argv = config.runtime.program.clone();
        probe_argv.extend(config.runtime.probe_args.iter().cloned());
        Self {
            root: root.into(),
            compose_file: config.compose.file.clone(),
            probe_argv,
            probe_timeout: Duration::from_secs(config.runtime.probe_timeout_secs),
        }
    }

    pub fn compose_file(&self) -> &str {
        &self.compose_file
    }

    fn runtime_responds(&self) -> bool {
        let cmd = match command_from_argv(&self.probe_argv, &self.root) {
            Ok(cmd) => cmd,
            Err(err) => {
                warn!(err = %err, "invalid runtime probe");
                return false;
            }
        };
        match run_command_with_timeout(cmd, self.probe_timeout, PROBE_OUTPUT_LIMIT_BYTES) {
            Ok(output) if output.success() => true,
            Ok(output) => {
                warn!(
                    exit_code = ?output.exit_code(),
                    timed_out = output.timed_out,
                    "container runtime probe failed"
                );
                false
            }
            Err(err) => {
                warn!(err = %format!("{err:#}"), "container runtime probe could not run");
                false
            }
        }
    }
}

impl EnvironmentCheck for ComposeEnvironment {
    #[instrument(skip_all, fields(compose_file = %self.compose_file))]
    fn validate(&self) -> bool {
        let compose_path = self.root.join(&self.compose_file);
        if !compose_path.is_file() {
            warn!(path = %compose_path.display(), "compose file missing");
            return false;
        }
        let ok = self.runtime_responds();
        debug!(ok, "environment validated");
        ok
    }
}
