//! Common utilities for MCP tools.

use std::sync::Arc;

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;

use crate::generation::Generator;

/// Error result for tool failures
pub fn tool_error(message: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(message.into())])
}

/// Success result carrying pretty-printed JSON
pub fn json_result<T: Serialize>(value: &T) -> CallToolResult {
    match serde_json::to_string_pretty(value) {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => tool_error(format!("Error: failed to serialize result: {}", e)),
    }
}

/// Get the configured generator, returning a tool error if there is none.
pub fn require_generator(
    generator: &Option<Arc<dyn Generator>>,
) -> Result<Arc<dyn Generator>, CallToolResult> {
    generator.clone().ok_or_else(|| {
        tool_error(
            "Error: No API key configured. Please run 'qe-suite login' or set GEMINI_API_KEY.",
        )
    })
}
