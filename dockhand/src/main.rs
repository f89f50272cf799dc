//! `dockhand`: run containerized toolchain operations and CI checks.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dockhand::core::operation::{Action, DEFAULT_RUN_LIMIT, Operation, UTILITY_TOOLS};
use dockhand::dispatch::Dispatcher;
use dockhand::io::config::{CONFIG_FILE_NAME, DockhandConfig, load_config, write_config};
use dockhand::logging;
use dockhand::serve::serve;

#[derive(Parser)]
#[command(
    name = "dockhand",
    version,
    about = "Run containerized toolchain operations and CI checks"
)]
struct Cli {
    /// Project root (defaults to the current directory).
    #[arg(long, global = true, value_name = "DIR")]
    project_root: Option<PathBuf>,

    /// Config file (defaults to `<project-root>/dockhand.toml`).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check code formatting.
    FormatCheck,
    /// Auto-fix code formatting.
    FormatFix,
    /// Run linting checks.
    Lint,
    /// Run static analysis.
    Analyze,
    /// Run the complete CI pipeline.
    FullCi,
    /// Start the development environment.
    StartDevEnv,
    /// Stop the development environment.
    StopDevEnv,
    /// Show project root and Docker availability.
    ProjectStatus,
    /// Show recent GitHub Actions workflow runs.
    CheckWorkflowRuns {
        /// Number of runs to show.
        #[arg(long, default_value_t = DEFAULT_RUN_LIMIT, value_parser = clap::value_parser!(u32).range(1..))]
        limit: u32,
        /// Only runs of this workflow.
        #[arg(long)]
        workflow: Option<String>,
    },
    /// Validate workflow YAML files under `.github/workflows`.
    ValidateWorkflowYaml {
        /// Validate only this file (name within `.github/workflows`).
        #[arg(long)]
        file: Option<String>,
    },
    /// Validate the `test_cases/` fixture directory.
    ValidateTestStructure,
    /// List tool names and descriptions.
    List,
    /// Write a default `dockhand.toml`.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
    /// Answer JSON-lines tool requests on stdin until EOF.
    Serve,
}

impl Command {
    fn operation(&self) -> Option<Operation> {
        let op = match self {
            Self::FormatCheck => Operation::Run(Action::FormatCheck),
            Self::FormatFix => Operation::Run(Action::FormatFix),
            Self::Lint => Operation::Run(Action::Lint),
            Self::Analyze => Operation::Run(Action::Analyze),
            Self::FullCi => Operation::Run(Action::FullCi),
            Self::StartDevEnv => Operation::Run(Action::StartDevEnv),
            Self::StopDevEnv => Operation::Run(Action::StopDevEnv),
            Self::ProjectStatus => Operation::ProjectStatus,
            Self::CheckWorkflowRuns { limit, workflow } => Operation::CheckWorkflowRuns {
                limit: *limit,
                workflow: workflow.clone(),
            },
            Self::ValidateWorkflowYaml { file } => {
                Operation::ValidateWorkflowYaml { file: file.clone() }
            }
            Self::ValidateTestStructure => Operation::ValidateTestStructure,
            Self::List | Self::Init { .. } | Self::Serve => return None,
        };
        Some(op)
    }
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let root = match cli.project_root {
        Some(root) => root,
        None => std::env::current_dir().context("resolve current directory")?,
    };
    let config_path = cli
        .config
        .unwrap_or_else(|| root.join(CONFIG_FILE_NAME));

    if let Command::Init { force } = cli.command {
        return cmd_init(&config_path, force);
    }

    let config = load_config(&config_path)?;
    let dispatcher = Dispatcher::new(&root, config);

    if let Some(operation) = cli.command.operation() {
        println!("{}", dispatcher.dispatch(&operation));
        return Ok(());
    }
    match cli.command {
        Command::List => {
            cmd_list(&dispatcher);
            Ok(())
        }
        Command::Serve => {
            let stdin = std::io::stdin();
            serve(&dispatcher, stdin.lock(), std::io::stdout().lock())?;
            Ok(())
        }
        _ => Ok(()),
    }
}

fn cmd_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    write_config(path, &DockhandConfig::default())?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn cmd_list(dispatcher: &Dispatcher) {
    for descriptor in dispatcher.catalog().iter() {
        println!("{:<24} {}", descriptor.name, descriptor.description);
    }
    for (name, description) in UTILITY_TOOLS {
        println!("{name:<24} {description}");
    }
}
