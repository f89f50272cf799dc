//! Orchestration: maps each [`Operation`] to the component that serves it.
//!
//! Executed actions go through environment validation, execution and
//! reporting. Everything returns text; no error crosses this boundary.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use crate::core::operation::{Operation, OperationCatalog, OperationDescriptor};
use crate::core::report::{OperationRun, render_report};
use crate::io::config::DockhandConfig;
use crate::io::environment::{ComposeEnvironment, EnvironmentCheck};
use crate::io::executor::{CommandExecutor, ProcessExecutor};
use crate::io::gh::{GhCli, HostingCli};
use crate::probe::check_workflow_runs;
use crate::status::project_status;
use crate::test_cases::validate_test_structure;
use crate::workflows::validate_workflow_yaml;

/// Validate the environment, then execute the descriptor.
///
/// The executor is never called when validation fails.
pub fn run_operation<V: EnvironmentCheck, E: CommandExecutor>(
    descriptor: &OperationDescriptor,
    compose_program: &[String],
    compose_file: &str,
    validator: &V,
    executor: &E,
) -> OperationRun {
    if !validator.validate() {
        warn!(operation = descriptor.name, "environment unavailable, skipping");
        return OperationRun::EnvironmentUnavailable {
            compose_file: compose_file.to_string(),
        };
    }
    let invocation = descriptor.invocation(compose_program);
    let outcome = executor.execute(&invocation, descriptor.timeout());
    info!(
        operation = descriptor.name,
        exit = ?outcome.exit_indicator(),
        duration_secs = outcome.duration_secs(),
        started_at = %outcome.started_at(),
        "operation finished"
    );
    OperationRun::Executed {
        invocation,
        outcome,
    }
}

/// Holds the configuration and collaborators for one project root.
///
/// Immutable after construction; safe to share between concurrent callers.
pub struct Dispatcher<V = ComposeEnvironment, E = ProcessExecutor, H = GhCli> {
    root: PathBuf,
    config: DockhandConfig,
    catalog: OperationCatalog,
    environment: V,
    executor: E,
    hosting: H,
}

impl Dispatcher {
    pub fn new(root: impl Into<PathBuf>, config: DockhandConfig) -> Self {
        let root = root.into();
        let environment = ComposeEnvironment::new(&root, &config);
        let executor = ProcessExecutor::new(&root, config.output_limit_bytes);
        let hosting = GhCli::new(&root, &config);
        Self::with_parts(root, config, environment, executor, hosting)
    }
}

impl<V: EnvironmentCheck, E: CommandExecutor, H: HostingCli> Dispatcher<V, E, H> {
    pub fn with_parts(
        root: impl Into<PathBuf>,
        config: DockhandConfig,
        environment: V,
        executor: E,
        hosting: H,
    ) -> Self {
        let catalog = OperationCatalog::new(&config.catalog_settings());
        Self {
            root: root.into(),
            config,
            catalog,
            environment,
            executor,
            hosting,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn catalog(&self) -> &OperationCatalog {
        &self.catalog
    }

    #[instrument(skip(self), fields(tool = operation.tool_name()))]
    pub fn dispatch(&self, operation: &Operation) -> String {
        match operation {
            Operation::Run(action) => {
                let descriptor = self.catalog.descriptor(*action);
                let run = run_operation(
                    descriptor,
                    &self.config.compose.program,
                    &self.config.compose.file,
                    &self.environment,
                    &self.executor,
                );
                render_report(descriptor, &run)
            }
            Operation::ProjectStatus => project_status(&self.root, &self.environment),
            Operation::CheckWorkflowRuns { limit, workflow } => {
                check_workflow_runs(&self.hosting, *limit, workflow.as_deref())
            }
            Operation::ValidateWorkflowYaml { file } => {
                validate_workflow_yaml(&self.root, file.as_deref())
            }
            Operation::ValidateTestStructure => validate_test_structure(&self.root),
        }
    }

    /// Resolve a tool name and JSON arguments, then dispatch.
    pub fn handle_request(&self, tool: &str, arguments: &Map<String, Value>) -> String {
        match Operation::from_request(tool, arguments) {
            Ok(operation) => self.dispatch(&operation),
            Err(err) => {
                warn!(tool, err = %err, "rejected request");
                format!("❌ Invalid request: {err:#}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::time::Duration;

    use anyhow::Result;
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::core::operation::{Action, Invocation};
    use crate::core::types::ExecutionOutcome;
    use crate::io::gh::CliOutput;
    use crate::test_support::ProjectDir;

    struct FixedEnvironment {
        ok: bool,
        calls: Cell<u32>,
    }

    impl FixedEnvironment {
        fn new(ok: bool) -> Self {
            Self {
                ok,
                calls: Cell::new(0),
            }
        }
    }

    impl EnvironmentCheck for FixedEnvironment {
        fn validate(&self) -> bool {
            self.calls.set(self.calls.get() + 1);
            self.ok
        }
    }

    struct RecordingExecutor {
        exit_code: i32,
        stdout: &'static str,
        calls: RefCell<Vec<(Invocation, Duration)>>,
    }

    impl RecordingExecutor {
        fn new(exit_code: i32, stdout: &'static str) -> Self {
            Self {
                exit_code,
                stdout,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl CommandExecutor for RecordingExecutor {
        fn execute(&self, invocation: &Invocation, timeout: Duration) -> ExecutionOutcome {
            self.calls.borrow_mut().push((invocation.clone(), timeout));
            ExecutionOutcome::Completed {
                exit_code: self.exit_code,
                stdout: self.stdout.to_string(),
                stderr: String::new(),
                duration: Duration::from_millis(5),
                started_at: Utc::now(),
            }
        }
    }

    struct NoHosting;

    impl HostingCli for NoHosting {
        fn version(&self) -> Result<CliOutput> {
            Err(anyhow::anyhow!("not installed"))
        }
        fn auth_status(&self) -> Result<CliOutput> {
            Err(anyhow::anyhow!("not installed"))
        }
        fn run_list(&self, _limit: u32, _workflow: Option<&str>) -> Result<CliOutput> {
            Err(anyhow::anyhow!("not installed"))
        }
        fn token_in_env(&self) -> bool {
            false
        }
    }

    fn dispatcher(
        root: &Path,
        environment_ok: bool,
        executor: RecordingExecutor,
    ) -> Dispatcher<FixedEnvironment, RecordingExecutor, NoHosting> {
        Dispatcher::with_parts(
            root,
            DockhandConfig::default(),
            FixedEnvironment::new(environment_ok),
            executor,
            NoHosting,
        )
    }

    #[test]
    fn unavailable_environment_never_executes() {
        let project = ProjectDir::new().expect("project");
        let d = dispatcher(project.root(), false, RecordingExecutor::new(0, ""));

        let report = d.dispatch(&Operation::Run(Action::Lint));
        assert!(report.contains("Docker environment validation failed"));
        assert!(!report.contains("Command:"));
        assert!(d.executor.calls.borrow().is_empty());
        assert_eq!(d.environment.calls.get(), 1);
    }

    #[test]
    fn executes_resolved_invocation_with_descriptor_timeout() {
        let project = ProjectDir::new().expect("project");
        let d = dispatcher(
            project.root(),
            true,
            RecordingExecutor::new(0, "Checking... 0 warnings\nAll checks passed"),
        );

        let report = d.dispatch(&Operation::Run(Action::FullCi));
        let calls = d.executor.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.to_string(), "docker-compose run --rm ci");
        assert_eq!(calls[0].1, Duration::from_secs(600));
        assert!(report.contains("📋 Command: docker-compose run --rm ci"));
        assert!(report.contains("✅ All checks passed"));
    }

    #[test]
    fn long_lived_actions_are_validated_too() {
        let project = ProjectDir::new().expect("project");
        let d = dispatcher(project.root(), true, RecordingExecutor::new(0, ""));

        d.dispatch(&Operation::Run(Action::StopDevEnv));
        assert_eq!(d.environment.calls.get(), 1);
        assert_eq!(
            d.executor.calls.borrow()[0].0.argv,
            vec!["docker-compose", "down"]
        );
    }

    #[test]
    fn utility_operations_skip_executor() {
        let project = ProjectDir::new().expect("project");
        let d = dispatcher(project.root(), true, RecordingExecutor::new(0, ""));

        assert!(d.dispatch(&Operation::ProjectStatus).contains("✅ Available"));
        assert!(
            d.dispatch(&Operation::ValidateWorkflowYaml { file: None })
                .contains("No .github/workflows directory found")
        );
        assert!(
            d.dispatch(&Operation::ValidateTestStructure)
                .contains("test_cases/ directory not found")
        );
        assert!(
            d.dispatch(&Operation::CheckWorkflowRuns {
                limit: 10,
                workflow: None
            })
            .contains("GitHub CLI not found")
        );
        assert!(d.executor.calls.borrow().is_empty());
    }

    #[test]
    fn handle_request_turns_bad_requests_into_text() {
        let project = ProjectDir::new().expect("project");
        let d = dispatcher(project.root(), true, RecordingExecutor::new(0, ""));

        let report = d.handle_request("deploy", &Map::new());
        assert_eq!(report, "❌ Invalid request: unknown tool 'deploy'");

        let Value::Object(args) = json!({"limit": -1}) else {
            panic!("object");
        };
        let report = d.handle_request("check_workflow_runs", &args);
        assert!(report.starts_with("❌ Invalid request"));
    }

    #[test]
    fn real_dispatcher_runs_fake_compose() {
        let project = ProjectDir::new().expect("project");
        project.write_compose_file().expect("compose file");
        let cfg = project.config_with_compose("echo \"compose $*\"; echo 'warning: slow' >&2; exit 1");
        let d = Dispatcher::new(project.root(), cfg);

        let report = d.dispatch(&Operation::Run(Action::Analyze));
        assert!(report.contains("🚀 Running static analysis..."));
        assert!(report.contains("❌ Failed with exit code 1"));
        assert!(report.contains("🔥 warning: slow"));
        assert!(report.contains("compose run --rm analyze"));
    }
}
