//! Minimal structural checks for CI workflow files.

use serde_yaml::{Mapping, Value};

/// Parse a workflow document and return its structural diagnostics.
///
/// An empty vector means the workflow is valid. YAML syntax errors are
/// returned as `Err`.
pub fn lint_workflow(contents: &str) -> Result<Vec<String>, serde_yaml::Error> {
    let document: Value = serde_yaml::from_str(contents)?;
    let mut errors = Vec::new();

    match &document {
        Value::Mapping(root) => check_root(root, &mut errors),
        _ => errors.push("Workflow must be a mapping".to_string()),
    }

    let lowered = contents.to_lowercase();
    if lowered.contains("runs-on: self-hosted") && !lowered.contains("container:") {
        errors.push("Self-hosted runner without container specification".to_string());
    }

    Ok(errors)
}

fn check_root(root: &Mapping, errors: &mut Vec<String>) {
    // YAML 1.1 loaders read a bare `on` key as boolean true.
    if !root.contains_key("on") && !root.contains_key(Value::Bool(true)) {
        errors.push("Missing 'on' trigger definition".to_string());
    }

    let Some(jobs) = root.get("jobs") else {
        errors.push("Missing 'jobs' definition".to_string());
        return;
    };
    let Value::Mapping(jobs) = jobs else {
        errors.push("'jobs' must be a dictionary".to_string());
        return;
    };

    for (name, job) in jobs {
        let name = key_name(name);
        let Value::Mapping(job) = job else {
            errors.push(format!("Job '{name}' must be a dictionary"));
            continue;
        };
        if !job.contains_key("runs-on") {
            errors.push(format!("Job '{name}' missing 'runs-on'"));
        }
        if let Some(Value::Mapping(container)) = job.get("container")
            && !container.contains_key("image")
        {
            errors.push(format!("Job '{name}' container missing 'image'"));
        }
    }
}

fn key_name(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => format!("{other:?}"),
    }
}
