//! Test-only helpers: scratch project roots and shell-backed fake programs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::io::config::DockhandConfig;

/// Program vector that runs `script` with `sh -c`.
///
/// Arguments appended by callers become the script's positional parameters
/// (`$1`, `$2`, ...), so a fake can inspect what it was invoked with.
pub fn fake_program(script: &str) -> Vec<String> {
    vec![
        "sh".to_string(),
        "-c".to_string(),
        script.to_string(),
        "fake".to_string(),
    ]
}

/// Temporary project root that is removed on drop.
pub struct ProjectDir {
    dir: TempDir,
}

impl ProjectDir {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp project")?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Write a minimal `docker-compose.yml`.
    pub fn write_compose_file(&self) -> Result<()> {
        self.write("docker-compose.yml", "services:\n  lint:\n    image: toolchain\n")
    }

    /// Write a file relative to the root, creating parent directories.
    pub fn write(&self, relative: &str, contents: &str) -> Result<()> {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))
    }

    /// Config whose container runtime always answers and whose compose program
    /// is the given shell script.
    pub fn config_with_compose(&self, compose_script: &str) -> DockhandConfig {
        let mut cfg = DockhandConfig::default();
        cfg.runtime.program = fake_program("exit 0");
        cfg.compose.program = fake_program(compose_script);
        cfg
    }
}
