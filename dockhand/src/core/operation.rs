//! The closed set of operations exposed by the dispatcher.
//!
//! Executed operations are described by an [`OperationDescriptor`] built once
//! from configuration. The descriptor is resolved into an [`Invocation`] (the
//! concrete argument vector) right before execution.

use std::fmt;
use std::time::Duration;

use anyhow::{Result, anyhow, bail};
use serde_json::{Map, Value};

/// Default number of workflow runs returned by the status probe.
pub const DEFAULT_RUN_LIMIT: u32 = 10;

/// Whether an action runs to completion in a throwaway container or drives the
/// declared service topology directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Wrapped in `run --rm <service>`.
    OneShot,
    /// Passed straight to the compose program (`up ...`, `down`).
    LongLived,
}

/// Operations executed through the container toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    FormatCheck,
    FormatFix,
    Lint,
    Analyze,
    FullCi,
    StartDevEnv,
    StopDevEnv,
}

impl Action {
    /// All actions, in listing order.
    pub const ALL: [Action; 7] = [
        Action::FormatCheck,
        Action::FormatFix,
        Action::Lint,
        Action::Analyze,
        Action::FullCi,
        Action::StartDevEnv,
        Action::StopDevEnv,
    ];

    pub fn tool_name(self) -> &'static str {
        match self {
            Self::FormatCheck => "format_check",
            Self::FormatFix => "format_fix",
            Self::Lint => "lint",
            Self::Analyze => "analyze",
            Self::FullCi => "full_ci",
            Self::StartDevEnv => "start_dev_env",
            Self::StopDevEnv => "stop_dev_env",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::FormatCheck => "Checking C++ code formatting...",
            Self::FormatFix => "Auto-fixing C++ formatting...",
            Self::Lint => "Running C++ linting checks...",
            Self::Analyze => "Running static analysis...",
            Self::FullCi => "Running complete CI pipeline...",
            Self::StartDevEnv => "Starting development environment...",
            Self::StopDevEnv => "Stopping development environment...",
        }
    }

    pub fn kind(self) -> OperationKind {
        match self {
            Self::StartDevEnv | Self::StopDevEnv => OperationKind::LongLived,
            Self::FormatCheck | Self::FormatFix | Self::Lint | Self::Analyze | Self::FullCi => {
                OperationKind::OneShot
            }
        }
    }
}

/// Settings the catalog needs from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSettings {
    pub default_timeout_secs: u64,
    pub ci_timeout_secs: u64,
    pub dev_service: String,
}

/// Immutable definition of one executed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub action: Action,
    pub name: &'static str,
    /// Title line of the report.
    pub description: &'static str,
    /// Sub-action words handed to the compose program.
    pub argument_vector: Vec<String>,
    pub timeout_seconds: u64,
    pub kind: OperationKind,
}

impl OperationDescriptor {
    pub fn new(action: Action, settings: &CatalogSettings) -> Self {
        let argument_vector: Vec<String> = match action {
            Action::FormatCheck => vec!["format-check".into()],
            Action::FormatFix => vec!["format-fix".into()],
            Action::Lint => vec!["lint".into()],
            Action::Analyze => vec!["analyze".into()],
            Action::FullCi => vec!["ci".into()],
            Action::StartDevEnv => vec!["up".into(), settings.dev_service.clone(), "-d".into()],
            Action::StopDevEnv => vec!["down".into()],
        };
        let timeout_seconds = match action {
            Action::FullCi => settings.ci_timeout_secs,
            _ => settings.default_timeout_secs,
        };
        Self {
            action,
            name: action.tool_name(),
            description: action.description(),
            argument_vector,
            timeout_seconds,
            kind: action.kind(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Resolve the concrete argument vector for the given compose program.
    pub fn invocation(&self, compose_program: &[String]) -> Invocation {
        let mut argv = compose_program.to_vec();
        if self.kind == OperationKind::OneShot {
            argv.push("run".to_string());
            argv.push("--rm".to_string());
        }
        argv.extend(self.argument_vector.iter().cloned());
        Invocation { argv }
    }
}

/// Fully resolved argument vector for one execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub argv: Vec<String>,
}

impl Invocation {
    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or(&[])
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argv.join(" "))
    }
}

/// Descriptors for every action, built once at startup.
#[derive(Debug, Clone)]
pub struct OperationCatalog {
    format_check: OperationDescriptor,
    format_fix: OperationDescriptor,
    lint: OperationDescriptor,
    analyze: OperationDescriptor,
    full_ci: OperationDescriptor,
    start_dev_env: OperationDescriptor,
    stop_dev_env: OperationDescriptor,
}

impl OperationCatalog {
    pub fn new(settings: &CatalogSettings) -> Self {
        let describe = |action| OperationDescriptor::new(action, settings);
        Self {
            format_check: describe(Action::FormatCheck),
            format_fix: describe(Action::FormatFix),
            lint: describe(Action::Lint),
            analyze: describe(Action::Analyze),
            full_ci: describe(Action::FullCi),
            start_dev_env: describe(Action::StartDevEnv),
            stop_dev_env: describe(Action::StopDevEnv),
        }
    }

    pub fn descriptor(&self, action: Action) -> &OperationDescriptor {
        match action {
            Action::FormatCheck => &self.format_check,
            Action::FormatFix => &self.format_fix,
            Action::Lint => &self.lint,
            Action::Analyze => &self.analyze,
            Action::FullCi => &self.full_ci,
            Action::StartDevEnv => &self.start_dev_env,
            Action::StopDevEnv => &self.stop_dev_env,
        }
    }

    /// Descriptors in `Action::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = &OperationDescriptor> {
        Action::ALL.into_iter().map(|action| self.descriptor(action))
    }
}

/// Every operation the dispatcher understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Run(Action),
    ProjectStatus,
    CheckWorkflowRuns {
        limit: u32,
        workflow: Option<String>,
    },
    ValidateWorkflowYaml {
        file: Option<String>,
    },
    ValidateTestStructure,
}

/// Tool names and descriptions for the non-executed operations.
pub const UTILITY_TOOLS: [(&str, &str); 4] = [
    (
        "project_status",
        "Get current project status and Docker environment info.",
    ),
    (
        "check_workflow_runs",
        "Check GitHub Actions workflow runs and status.",
    ),
    (
        "validate_workflow_yaml",
        "Validate GitHub Actions workflow YAML files for syntax errors.",
    ),
    (
        "validate_test_structure",
        "Validate test_cases/ directory structure and YAML files.",
    ),
];

impl Operation {
    pub fn tool_name(&self) -> &'static str {
        match self {
            Self::Run(action) => action.tool_name(),
            Self::ProjectStatus => "project_status",
            Self::CheckWorkflowRuns { .. } => "check_workflow_runs",
            Self::ValidateWorkflowYaml { .. } => "validate_workflow_yaml",
            Self::ValidateTestStructure => "validate_test_structure",
        }
    }

    /// Build an operation from a tool name and its JSON arguments.
    ///
    /// Unknown arguments are ignored; known arguments with the wrong type are
    /// rejected.
    pub fn from_request(tool: &str, arguments: &Map<String, Value>) -> Result<Self> {
        if let Some(action) = Action::ALL.iter().find(|a| a.tool_name() == tool) {
            return Ok(Self::Run(*action));
        }
        match tool {
            "project_status" => Ok(Self::ProjectStatus),
            "check_workflow_runs" => {
                let limit = match arguments.get("limit") {
                    None | Some(Value::Null) => DEFAULT_RUN_LIMIT,
                    Some(value) => value
                        .as_u64()
                        .filter(|limit| *limit > 0)
                        .and_then(|limit| u32::try_from(limit).ok())
                        .ok_or_else(|| anyhow!("'limit' must be a positive integer"))?,
                };
                let workflow = optional_string(arguments, "workflow_name")?;
                Ok(Self::CheckWorkflowRuns { limit, workflow })
            }
            "validate_workflow_yaml" => Ok(Self::ValidateWorkflowYaml {
                file: optional_string(arguments, "workflow_file")?,
            }),
            "validate_test_structure" => Ok(Self::ValidateTestStructure),
            other => bail!("unknown tool '{other}'"),
        }
    }
}

fn optional_string(arguments: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match arguments.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(anyhow!("'{key}' must be a string")),
    }
}
