//! Hosting CLI adapter (`gh`) for CI status queries.
//!
//! We only need three invocation shapes (version, auth status, run list), so
//! this stays a small explicit wrapper around subprocess calls.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, anyhow};
use tracing::{debug, instrument};

use crate::core::run_status::RUN_FIELDS;
use crate::io::config::DockhandConfig;
use crate::io::process::{command_from_argv, run_command_with_timeout};

const OUTPUT_LIMIT_BYTES: usize = 4 * 1024 * 1024;

/// Environment variables the hosting CLI reads a token from.
pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Captured result of one hosting CLI call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Operations the status probe needs from the hosting CLI.
///
/// `Err` means the CLI could not be run at all (missing executable, timeout).
pub trait HostingCli {
    fn version(&self) -> Result<CliOutput>;
    fn auth_status(&self) -> Result<CliOutput>;
    fn run_list(&self, limit: u32, workflow: Option<&str>) -> Result<CliOutput>;
    /// True when a token is available in the environment.
    fn token_in_env(&self) -> bool;
}

/// Wrapper for executing `gh` in the project root.
#[derive(Debug, Clone)]
pub struct GhCli {
    workdir: PathBuf,
    program: Vec<String>,
    timeout: Duration,
}

impl GhCli {
    pub fn new(workdir: impl Into<PathBuf>, config: &DockhandConfig) -> Self {
        Self {
            workdir: workdir.into(),
            program: config.hosting.program.clone(),
            timeout: Duration::from_secs(config.hosting.timeout_secs),
        }
    }

    fn run(&self, args: &[&str]) -> Result<CliOutput> {
        let mut argv = self.program.clone();
        argv.extend(args.iter().map(|arg| arg.to_string()));
        let cmd = command_from_argv(&argv, &self.workdir)?;
        let output = run_command_with_timeout(cmd, self.timeout, OUTPUT_LIMIT_BYTES)?;
        if output.timed_out {
            return Err(anyhow!(
                "gh {} timed out after {}s",
                args.join(" "),
                self.timeout.as_secs()
            ));
        }
        debug!(args = %args.join(" "), exit_code = ?output.exit_code(), "gh finished");
        Ok(CliOutput {
            success: output.success(),
            stdout: output.stdout_lossy(),
            stderr: output.stderr_lossy(),
        })
    }
}

impl HostingCli for GhCli {
    fn version(&self) -> Result<CliOutput> {
        self.run(&["--version"])
    }

    fn auth_status(&self) -> Result<CliOutput> {
        self.run(&["auth", "status"])
    }

    #[instrument(skip(self))]
    fn run_list(&self, limit: u32, workflow: Option<&str>) -> Result<CliOutput> {
        let limit = limit.to_string();
        let mut args = vec!["run", "list", "--limit", limit.as_str(), "--json", RUN_FIELDS];
        if let Some(workflow) = workflow {
            args.push("--workflow");
            args.push(workflow);
        }
        self.run(&args)
    }

    fn token_in_env(&self) -> bool {
        TOKEN_ENV_VARS
            .iter()
            .any(|name| std::env::var_os(name).is_some_and(|value| !value.is_empty()))
    }
}
