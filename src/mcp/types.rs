//! MCP tool parameter types.
//!
//! These types are used with rmcp's `Parameters<T>` wrapper for automatic
//! deserialization and JSON schema generation.

use schemars::JsonSchema;
use serde::Deserialize;

use crate::automation::AutomationMode;
use crate::domain::Priority;
use crate::generation::PromptContext;

/// Parameters for tools that take no arguments
#[derive(Debug, Deserialize, JsonSchema)]
pub struct NoArgs {}

/// Parameters for tools acting on one test case
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TestCaseIdArgs {
    /// Test case id, e.g. TC_001
    pub id: String,
}

/// An uploaded document, base64-encoded
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DocumentInput {
    /// File name, used to guess the type when `mime_type` is absent
    #[serde(default)]
    pub name: Option<String>,
    /// Declared MIME type
    #[serde(default)]
    pub mime_type: Option<String>,
    /// File content, base64-encoded
    pub content_base64: String,
}

/// Parameters for the generate_test_cases tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GenerateTestCasesArgs {
    /// Requirements or user story text
    #[serde(default)]
    pub requirements: Option<String>,
    /// Document to extract requirements from when `requirements` is empty
    #[serde(default)]
    pub document: Option<DocumentInput>,
    /// Generate from the manual-creation form fields instead of requirements
    #[serde(default)]
    pub context: Option<PromptContext>,
    /// Number of test cases to generate (1-50, default 5)
    #[serde(default)]
    pub count: Option<u32>,
    /// Priority for cases the model does not classify (default Medium)
    #[serde(default)]
    pub default_priority: Option<Priority>,
}

/// Parameters for the select_all tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SelectAllArgs {
    /// true selects every case, false clears the selection
    pub selected: bool,
}

/// Parameters for the request_automation tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RequestAutomationArgs {
    /// Automate only this case; otherwise every selected case
    #[serde(default)]
    pub id: Option<String>,
}

/// Parameters for the generate_automation tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GenerateAutomationArgs {
    /// combined: one suite for all cases; separate: one class per case
    #[serde(default)]
    pub mode: Option<AutomationMode>,
}

/// Parameters for the export_archive tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExportArchiveArgs {
    /// Directory to write the archives to
    pub output_dir: String,
    /// Only export this result key ("combined" or a test case id)
    #[serde(default)]
    pub key: Option<String>,
}

/// Parameters for the export_spreadsheet tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExportSpreadsheetArgs {
    /// Output path (default: test_cases.xlsx in the current directory)
    #[serde(default)]
    pub path: Option<String>,
}
