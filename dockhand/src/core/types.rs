//! Shared deterministic types for the execution core.
//!
//! These types define the contracts between the executor, the classifier and
//! the reporter. They carry no I/O and are safe to construct in tests.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Severity tag attached to a single line of tool output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Error,
    Plain,
    /// Uniform tag for every non-blank line of a standard-error capture.
    Highlighted,
}

impl Severity {
    /// Prefix inserted in front of a rendered line (empty for `Plain`).
    pub fn marker(self) -> &'static str {
        match self {
            Self::Success => "✅ ",
            Self::Warning => "🟡 ",
            Self::Error => "🔴 ",
            Self::Plain => "",
            Self::Highlighted => "🔥 ",
        }
    }
}

/// One output line paired with its severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub severity: Severity,
    pub text: String,
}

impl ClassifiedLine {
    pub fn render(&self) -> String {
        format!("{}{}", self.severity.marker(), self.text)
    }
}

/// Exit indicator reported for an executed invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitIndicator {
    Code(i32),
    /// Sentinel for a process killed after exceeding its timeout.
    TimedOut,
}

impl fmt::Display for ExitIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::TimedOut => f.write_str("timeout"),
        }
    }
}

/// Terminal result of running one invocation. Produced exactly once per call.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// The process ran to completion (any exit code).
    Completed {
        exit_code: i32,
        stdout: String,
        stderr: String,
        duration: Duration,
        started_at: DateTime<Utc>,
    },
    /// The process exceeded its timeout and was killed. Nothing was captured.
    TimedOut {
        timeout: Duration,
        started_at: DateTime<Utc>,
    },
    /// The process could not be started (e.g. the executable is missing).
    SpawnFailed {
        error: String,
        started_at: DateTime<Utc>,
    },
}

impl ExecutionOutcome {
    /// `None` when the process never started.
    pub fn exit_indicator(&self) -> Option<ExitIndicator> {
        match self {
            Self::Completed { exit_code, .. } => Some(ExitIndicator::Code(*exit_code)),
            Self::TimedOut { .. } => Some(ExitIndicator::TimedOut),
            Self::SpawnFailed { .. } => None,
        }
    }

    /// Wall-clock duration in seconds. Timeouts report the configured bound.
    pub fn duration_secs(&self) -> f64 {
        match self {
            Self::Completed { duration, .. } => duration.as_secs_f64(),
            Self::TimedOut { timeout, .. } => timeout.as_secs_f64(),
            Self::SpawnFailed { .. } => 0.0,
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        match self {
            Self::Completed { started_at, .. }
            | Self::TimedOut { started_at, .. }
            | Self::SpawnFailed { started_at, .. } => *started_at,
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Completed { exit_code: 0, .. })
    }
}
