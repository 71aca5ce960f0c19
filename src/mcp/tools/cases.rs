//! Test case tools: create, list, edit, select, delete, stats.

use rmcp::{model::*, ErrorData as McpError};
use serde_json::json;

use crate::domain::TestCaseForm;
use crate::mcp::types::{SelectAllArgs, TestCaseIdArgs};
use crate::session::SharedSession;
use crate::workspace::{Transition, WorkspaceError};

use super::common::{json_result, tool_error};

fn transition_result(result: Result<Transition, WorkspaceError>) -> CallToolResult {
    match result {
        Ok(transition) => json_result(&transition),
        Err(e) => tool_error(format!("Error: {}", e)),
    }
}

/// Validate the form and append a new test case
pub async fn create_test_case(
    session: &SharedSession,
    form: TestCaseForm,
) -> Result<CallToolResult, McpError> {
    let mut session = session.lock().await;
    let transition = match session.workspace.create_manual(form) {
        Ok(t) => t,
        Err(e) => return Ok(tool_error(format!("Error: {}", e))),
    };

    let case = session.workspace.cases().last();
    Ok(json_result(&json!({
        "transition": transition,
        "test_case": case,
    })))
}

/// List every test case in workspace order
pub async fn list_test_cases(session: &SharedSession) -> Result<CallToolResult, McpError> {
    let session = session.lock().await;
    Ok(json_result(&json!({
        "state": session.workspace.state(),
        "test_cases": session.workspace.cases(),
    })))
}

/// Open a test case for editing and return its current values as a form
pub async fn begin_edit(
    session: &SharedSession,
    args: TestCaseIdArgs,
) -> Result<CallToolResult, McpError> {
    let mut session = session.lock().await;
    let transition = match session.workspace.begin_edit(&args.id) {
        Ok(t) => t,
        Err(e) => return Ok(tool_error(format!("Error: {}", e))),
    };

    let form = session
        .workspace
        .editing()
        .map(|edit| TestCaseForm::from(edit.snapshot()));
    Ok(json_result(&json!({
        "transition": transition,
        "form": form,
    })))
}

pub async fn save_edit(
    session: &SharedSession,
    form: TestCaseForm,
) -> Result<CallToolResult, McpError> {
    let mut session = session.lock().await;
    Ok(transition_result(session.workspace.save_edit(form)))
}

pub async fn cancel_edit(session: &SharedSession) -> Result<CallToolResult, McpError> {
    let mut session = session.lock().await;
    Ok(transition_result(session.workspace.cancel_edit()))
}

pub async fn toggle_select(
    session: &SharedSession,
    args: TestCaseIdArgs,
) -> Result<CallToolResult, McpError> {
    let mut session = session.lock().await;
    Ok(transition_result(session.workspace.toggle_select(&args.id)))
}

pub async fn select_all(
    session: &SharedSession,
    args: SelectAllArgs,
) -> Result<CallToolResult, McpError> {
    let mut session = session.lock().await;
    Ok(transition_result(session.workspace.select_all(args.selected)))
}

pub async fn delete_selected(session: &SharedSession) -> Result<CallToolResult, McpError> {
    let mut session = session.lock().await;
    Ok(transition_result(session.workspace.delete_selected()))
}

pub async fn workspace_stats(session: &SharedSession) -> Result<CallToolResult, McpError> {
    let session = session.lock().await;
    Ok(json_result(&session.workspace.stats()))
}
