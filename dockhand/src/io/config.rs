//! Dispatcher configuration stored in `dockhand.toml` at the project root.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::operation::CatalogSettings;

pub const CONFIG_FILE_NAME: &str = "dockhand.toml";

/// Dispatcher configuration (TOML).
///
/// Every section is optional; missing fields fall back to the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DockhandConfig {
    /// Truncate captured stdout/stderr beyond this many bytes per stream.
    pub output_limit_bytes: usize,

    pub compose: ComposeConfig,
    pub runtime: RuntimeConfig,
    pub hosting: HostingConfig,
    pub timeouts: TimeoutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ComposeConfig {
    /// Compose program and leading arguments (e.g. `["docker","compose"]`).
    pub program: Vec<String>,
    /// Service-topology descriptor, relative to the project root.
    pub file: String,
    /// Service started by `start_dev_env`.
    pub dev_service: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Container engine program used for the liveness probe.
    pub program: Vec<String>,
    pub probe_args: Vec<String>,
    pub probe_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HostingConfig {
    /// Hosting CLI program and leading arguments.
    pub program: Vec<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimeoutConfig {
    pub default_secs: u64,
    /// Timeout for the full CI pipeline.
    pub ci_secs: u64,
}

impl Default for DockhandConfig {
    fn default() -> Self {
        Self {
            output_limit_bytes: 1_000_000,
            compose: ComposeConfig::default(),
            runtime: RuntimeConfig::default(),
            hosting: HostingConfig::default(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            program: vec!["docker-compose".to_string()],
            file: "docker-compose.yml".to_string(),
            dev_service: "mcp-server".to_string(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            program: vec!["docker".to_string()],
            probe_args: vec!["ps".to_string()],
            probe_timeout_secs: 30,
        }
    }
}

impl Default for HostingConfig {
    fn default() -> Self {
        Self {
            program: vec!["gh".to_string()],
            timeout_secs: 60,
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            default_secs: 300,
            ci_secs: 600,
        }
    }
}

impl DockhandConfig {
    pub fn validate(&self) -> Result<()> {
        if self.output_limit_bytes == 0 {
            return Err(anyhow!("output_limit_bytes must be > 0"));
        }
        ensure_program("compose.program", &self.compose.program)?;
        ensure_program("runtime.program", &self.runtime.program)?;
        ensure_program("hosting.program", &self.hosting.program)?;
        if self.compose.file.trim().is_empty() {
            return Err(anyhow!("compose.file must not be empty"));
        }
        if self.compose.dev_service.trim().is_empty() {
            return Err(anyhow!("compose.dev_service must not be empty"));
        }
        if self.runtime.probe_timeout_secs == 0 {
            return Err(anyhow!("runtime.probe_timeout_secs must be > 0"));
        }
        if self.hosting.timeout_secs == 0 {
            return Err(anyhow!("hosting.timeout_secs must be > 0"));
        }
        if self.timeouts.default_secs == 0 || self.timeouts.ci_secs == 0 {
            return Err(anyhow!("timeouts must be > 0"));
        }
        Ok(())
    }

    pub fn catalog_settings(&self) -> CatalogSettings {
        CatalogSettings {
            default_timeout_secs: self.timeouts.default_secs,
            ci_timeout_secs: self.timeouts.ci_secs,
            dev_service: self.compose.dev_service.clone(),
        }
    }
}

fn ensure_program(key: &str, program: &[String]) -> Result<()> {
    match program.first() {
        Some(name) if !name.trim().is_empty() => Ok(()),
        _ => Err(anyhow!("{key} must be a non-empty array")),
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `DockhandConfig::default()`.
pub fn load_config(path: &Path) -> Result<DockhandConfig> {
    if !path.exists() {
        let cfg = DockhandConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: DockhandConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &DockhandConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, DockhandConfig::default());
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE_NAME);
        let mut cfg = DockhandConfig::default();
        cfg.compose.program = vec!["docker".to_string(), "compose".to_string()];
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[timeouts]\nci_secs = 900\n").expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.timeouts.ci_secs, 900);
        assert_eq!(cfg.timeouts.default_secs, 300);
        assert_eq!(cfg.compose.file, "docker-compose.yml");
    }

    #[test]
    fn rejects_empty_program_and_zero_timeout() {
        let mut cfg = DockhandConfig::default();
        cfg.hosting.program = Vec::new();
        assert!(cfg.validate().unwrap_err().to_string().contains("hosting.program"));

        let mut cfg = DockhandConfig::default();
        cfg.timeouts.default_secs = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn catalog_settings_follow_config() {
        let mut cfg = DockhandConfig::default();
        cfg.compose.dev_service = "devbox".to_string();
        let settings = cfg.catalog_settings();
        assert_eq!(settings.dev_service, "devbox");
        assert_eq!(settings.ci_timeout_secs, 600);
    }
}
