//! Generation tools: test cases from a prompt, and document extraction.

use std::path::Path;
use std::sync::Arc;

use base64::Engine;
use rmcp::{model::*, ErrorData as McpError};
use serde_json::json;
use tracing::debug;

use crate::extract::{extract_text, guess_mime_type};
use crate::generation::{Generator, PromptSource};
use crate::mcp::types::{DocumentInput, GenerateTestCasesArgs};
use crate::session::SharedSession;
use crate::workspace::Change;

use super::common::{json_result, require_generator, tool_error};

/// Default number of cases per generation request
pub const DEFAULT_COUNT: u32 = 5;

/// Decode and extract an uploaded document.
fn document_text(doc: &DocumentInput) -> Result<String, String> {
    let mime_type = doc
        .mime_type
        .clone()
        .or_else(|| {
            doc.name
                .as_deref()
                .and_then(|name| guess_mime_type(Path::new(name)))
                .map(str::to_string)
        })
        .ok_or_else(|| {
            "Error: mime_type is required when the file type cannot be guessed".to_string()
        })?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(doc.content_base64.trim())
        .map_err(|e| format!("Error: content_base64 is not valid base64: {}", e))?;

    debug!("Extracting {} ({} bytes)", mime_type, bytes.len());
    extract_text(&mime_type, &bytes).map_err(|e| format!("Error: {}", e))
}

/// Generate test cases and append them to the workspace
pub async fn generate_test_cases(
    session: &SharedSession,
    generator: &Option<Arc<dyn Generator>>,
    args: GenerateTestCasesArgs,
) -> Result<CallToolResult, McpError> {
    let generator = match require_generator(generator) {
        Ok(g) => g,
        Err(e) => return Ok(e),
    };

    let source = match (args.context, args.requirements, args.document) {
        (Some(ctx), _, _) => PromptSource::Context(ctx),
        (None, Some(text), _) if !text.trim().is_empty() => PromptSource::Requirements(text),
        (None, _, Some(doc)) => match document_text(&doc) {
            Ok(text) => PromptSource::Requirements(text),
            Err(e) => return Ok(tool_error(e)),
        },
        (None, _, None) => PromptSource::Requirements(String::new()),
    };

    let count = args.count.unwrap_or(DEFAULT_COUNT);
    let priority = args.default_priority.unwrap_or_default();

    let mut session = session.lock().await;
    let transition = match session
        .workspace
        .generate_from_prompt(generator.as_ref(), &source, count, priority)
        .await
    {
        Ok(t) => t,
        Err(e) => return Ok(tool_error(format!("Error: {}", e))),
    };

    match &transition.change {
        Change::Generated {
            failure: Some(reason),
            ..
        } => Ok(tool_error(format!(
            "Error: test case generation failed, no cases were added: {}",
            reason
        ))),
        Change::Generated { ids, .. } => {
            let cases: Vec<_> = session
                .workspace
                .cases()
                .iter()
                .filter(|c| ids.contains(&c.id))
                .collect();
            Ok(json_result(&json!({
                "transition": transition,
                "test_cases": cases,
            })))
        }
        _ => Ok(json_result(&transition)),
    }
}

/// Extract plain text from an uploaded document
pub fn extract_document(args: DocumentInput) -> Result<CallToolResult, McpError> {
    match document_text(&args) {
        Ok(text) if text.trim().is_empty() => Ok(tool_error("Error: No text found in document")),
        Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
        Err(e) => Ok(tool_error(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::MIME_TEXT;

    #[test]
    fn test_document_text_guesses_type_from_name() {
        let doc = DocumentInput {
            name: Some("story.txt".to_string()),
            mime_type: None,
            content_base64: "QXMgYSB1c2Vy".to_string(),
        };
        assert_eq!(document_text(&doc).unwrap(), "As a user");
    }

    #[test]
    fn test_document_text_errors() {
        let doc = DocumentInput {
            name: None,
            mime_type: None,
            content_base64: "QXMgYSB1c2Vy".to_string(),
        };
        assert!(document_text(&doc).unwrap_err().contains("mime_type"));

        let doc = DocumentInput {
            name: None,
            mime_type: Some(MIME_TEXT.to_string()),
            content_base64: "not base64!".to_string(),
        };
        assert!(document_text(&doc).unwrap_err().contains("base64"));

        let doc = DocumentInput {
            name: None,
            mime_type: Some("image/png".to_string()),
            content_base64: "QXMgYSB1c2Vy".to_string(),
        };
        assert!(document_text(&doc).unwrap_err().contains("Unsupported"));
    }
}
