//! Project status summary.

use std::path::Path;

use crate::io::environment::EnvironmentCheck;

pub fn project_status<V: EnvironmentCheck>(root: &Path, validator: &V) -> String {
    let docker = if validator.validate() {
        "✅ Available"
    } else {
        "❌ Not available"
    };
    [
        "📊 Project Status".to_string(),
        format!("📁 Project root: {}", root.display()),
        String::new(),
        format!("🐳 Docker: {docker}"),
    ]
    .join("\n")
}
