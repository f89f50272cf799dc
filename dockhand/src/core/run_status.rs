//! Rendering of CI workflow run records returned by the hosting CLI.

use serde_json::Value;

const UNKNOWN: &str = "unknown";

/// Fields requested from `gh run list --json`.
pub const RUN_FIELDS: &str =
    "status,conclusion,name,createdAt,headBranch,workflowName,url,databaseId";

/// One workflow run, with every displayed field already defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowRun {
    pub status: String,
    pub conclusion: String,
    pub name: String,
    pub branch: String,
    pub created: String,
    pub url: Option<String>,
    pub id: String,
}

impl WorkflowRun {
    /// Extract a run from one JSON record. Missing or malformed fields become
    /// `"unknown"` (or no URL).
    pub fn from_json(record: &Value) -> Self {
        let url = record
            .get("url")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(str::to_string);
        Self {
            status: scalar_field(record, "status"),
            conclusion: scalar_field(record, "conclusion"),
            name: scalar_field(record, "workflowName"),
            branch: scalar_field(record, "headBranch"),
            created: scalar_field(record, "createdAt"),
            url,
            id: scalar_field(record, "databaseId"),
        }
    }

    pub fn icon(&self) -> StatusIcon {
        status_icon(&self.status, &self.conclusion)
    }

    /// Render the run as an indented block (no trailing blank line).
    pub fn render(&self) -> Vec<String> {
        let mut lines = vec![
            format!("{} **{}** ({})", self.icon().glyph(), self.name, self.branch),
            format!(
                "   Status: {} | Conclusion: {}",
                self.status, self.conclusion
            ),
            format!("   Created: {}", truncate_timestamp(&self.created)),
            format!("   Run ID: {}", self.id),
        ];
        if let Some(url) = &self.url {
            lines.push(format!("   URL: {url}"));
        }
        lines
    }
}

/// Visual status of a workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIcon {
    Done,
    Failed,
    Cancelled,
    Ambiguous,
    Running,
    Pending,
    Unknown,
}

impl StatusIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Done => "✅",
            Self::Failed => "❌",
            Self::Cancelled => "🚫",
            Self::Ambiguous => "⚠️",
            Self::Running => "🔄",
            Self::Pending => "⏳",
            Self::Unknown => "❓",
        }
    }
}

pub fn status_icon(status: &str, conclusion: &str) -> StatusIcon {
    match (status, conclusion) {
        ("completed", "success") => StatusIcon::Done,
        ("completed", "failure") => StatusIcon::Failed,
        ("completed", "cancelled") => StatusIcon::Cancelled,
        ("completed", _) => StatusIcon::Ambiguous,
        ("in_progress", _) => StatusIcon::Running,
        ("queued", _) => StatusIcon::Pending,
        _ => StatusIcon::Unknown,
    }
}

/// Keep date and time (`YYYY-MM-DD HH:MM:SS`), dropping fractional seconds and
/// the timezone marker.
pub fn truncate_timestamp(raw: &str) -> String {
    raw.chars()
        .take(19)
        .map(|c| if c == 'T' { ' ' } else { c })
        .collect()
}

/// Parse the `gh run list --json` payload into runs.
///
/// The payload must be a JSON array; individual records never fail.
pub fn parse_runs(payload: &str) -> Result<Vec<WorkflowRun>, serde_json::Error> {
    let records: Vec<Value> = serde_json::from_str(payload)?;
    Ok(records.iter().map(WorkflowRun::from_json).collect())
}

fn scalar_field(record: &Value, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => UNKNOWN.to_string(),
    }
}
