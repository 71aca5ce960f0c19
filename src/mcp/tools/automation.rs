//! Automation tools: request, generate, and export.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::{model::*, ErrorData as McpError};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::automation::{AutomationOutcome, AutomationRun};
use crate::export::{archive_name, write_archive, write_spreadsheet, SPREADSHEET_FILE_NAME};
use crate::generation::Generator;
use crate::mcp::types::{
    ExportArchiveArgs, ExportSpreadsheetArgs, GenerateAutomationArgs, RequestAutomationArgs,
};
use crate::session::SharedSession;
use crate::workspace::AutomationSelection;

use super::common::{json_result, require_generator, tool_error};

fn run_summary(run: &AutomationRun) -> Value {
    let results: Vec<Value> = run
        .results
        .iter()
        .map(|result| match &result.outcome {
            AutomationOutcome::Files(files) => json!({
                "key": result.key,
                "archive": archive_name(&result.key),
                "files": files
                    .usable_files()
                    .map(|(path, content)| json!({ "path": path, "content": content }))
                    .collect::<Vec<_>>(),
            }),
            AutomationOutcome::Failed(reason) => json!({
                "key": result.key,
                "error": reason,
            }),
        })
        .collect();

    json!({
        "mode": run.mode,
        "generated_at": run.generated_at.to_rfc3339(),
        "failed": run.failures().count(),
        "results": results,
    })
}

/// Snapshot the cases to automate
pub async fn request_automation(
    session: &SharedSession,
    args: RequestAutomationArgs,
) -> Result<CallToolResult, McpError> {
    let selection = match args.id {
        Some(id) => AutomationSelection::Single(id),
        None => AutomationSelection::Selected,
    };

    let mut session = session.lock().await;
    match session.workspace.request_automation(selection) {
        Ok(transition) => Ok(json_result(&transition)),
        Err(e) => Ok(tool_error(format!("Error: {}", e))),
    }
}

/// Generate automation code for the current snapshot
pub async fn generate_automation(
    session: &SharedSession,
    generator: &Option<Arc<dyn Generator>>,
    args: GenerateAutomationArgs,
) -> Result<CallToolResult, McpError> {
    let generator = match require_generator(generator) {
        Ok(g) => g,
        Err(e) => return Ok(e),
    };

    let mut session = session.lock().await;
    if session.workspace.selected_for_automation().is_empty() {
        return Ok(tool_error(
            "Error: Nothing to automate. Select test cases and call request_automation first.",
        ));
    }

    let mode = args.mode.unwrap_or_default();
    let run = session.generate_automation(generator.as_ref(), mode).await;
    Ok(json_result(&run_summary(run)))
}

/// Write one zip archive per successful result of the last run
pub async fn export_archive(
    session: &SharedSession,
    args: ExportArchiveArgs,
) -> Result<CallToolResult, McpError> {
    let session = session.lock().await;
    let Some(run) = session.last_run() else {
        return Ok(tool_error(
            "Error: No automation code generated yet. Call generate_automation first.",
        ));
    };

    if let Some(key) = args.key.as_deref() {
        if run.get(key).is_none() {
            return Ok(tool_error(format!(
                "Error: The last automation run has no result for {}",
                key
            )));
        }
    }

    let output_dir = PathBuf::from(&args.output_dir);
    if let Err(e) = tokio::fs::create_dir_all(&output_dir).await {
        return Ok(tool_error(format!(
            "Error: Failed to create {}: {}",
            output_dir.display(),
            e
        )));
    }

    let mut written = Vec::new();
    let mut skipped = Vec::new();
    for result in &run.results {
        if args.key.as_deref().is_some_and(|key| key != result.key) {
            continue;
        }
        let Some(files) = result.files() else {
            skipped.push(json!({ "key": result.key, "reason": "generation failed" }));
            continue;
        };

        let bytes = match write_archive(files) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Skipping archive for {}: {}", result.key, e);
                skipped.push(json!({ "key": result.key, "reason": e.to_string() }));
                continue;
            }
        };

        let path = output_dir.join(archive_name(&result.key));
        if let Err(e) = tokio::fs::write(&path, &bytes).await {
            return Ok(tool_error(format!(
                "Error: Failed to write {}: {}",
                path.display(),
                e
            )));
        }
        info!("Wrote {}", path.display());
        written.push(path.display().to_string());
    }

    if written.is_empty() && skipped.is_empty() {
        if let Some(key) = &args.key {
            return Ok(tool_error(format!("Error: No result for key {}", key)));
        }
    }

    Ok(json_result(&json!({
        "written": written,
        "skipped": skipped,
    })))
}

/// Write every test case to an .xlsx workbook
pub async fn export_spreadsheet(
    session: &SharedSession,
    args: ExportSpreadsheetArgs,
) -> Result<CallToolResult, McpError> {
    let session = session.lock().await;
    let bytes = match write_spreadsheet(session.workspace.cases()) {
        Ok(bytes) => bytes,
        Err(e) => return Ok(tool_error(format!("Error: {}", e))),
    };

    let path = PathBuf::from(args.path.unwrap_or_else(|| SPREADSHEET_FILE_NAME.to_string()));
    if let Err(e) = tokio::fs::write(&path, &bytes).await {
        return Ok(tool_error(format!(
            "Error: Failed to write {}: {}",
            path.display(),
            e
        )));
    }

    info!(
        "Exported {} test cases to {}",
        session.workspace.cases().len(),
        path.display()
    );
    Ok(json_result(&json!({
        "path": path.display().to_string(),
        "rows": session.workspace.cases().len(),
    })))
}
