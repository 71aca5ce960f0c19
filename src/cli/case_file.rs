//! JSON case file used by the command-line front end.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::domain::TestCase;

/// Load test cases from `path`. A missing file is an empty list.
pub fn load_cases(path: &Path) -> Result<Vec<TestCase>> {
    if !path.exists() {
        debug!("{} does not exist, starting empty", path.display());
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read case file: {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse case file: {}", path.display()))
}

/// Write test cases to `path` as pretty JSON.
pub fn save_cases(path: &Path, cases: &[TestCase]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let content = serde_json::to_string_pretty(cases).context("Failed to serialize test cases")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write case file: {}", path.display()))?;

    debug!("Saved {} test cases to {}", cases.len(), path.display());
    Ok(())
}
