//! MCP server implementation.
//!
//! This module contains the QeSuiteMcpServer struct and its tool routing.

use std::sync::Arc;

use rmcp::{
    handler::server::router::tool::ToolRouter, handler::server::wrapper::Parameters, model::*,
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};

use crate::domain::TestCaseForm;
use crate::generation::Generator;
use crate::session::{create_shared_session, Session, SharedSession};

use super::tools;
use super::types::*;

/// QE Suite MCP Server
///
/// Each instance owns the session of one client connection.
#[derive(Clone)]
pub struct QeSuiteMcpServer {
    session: SharedSession,
    generator: Option<Arc<dyn Generator>>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl QeSuiteMcpServer {
    /// Create a new server with an empty session
    ///
    /// # Arguments
    /// * `generator` - Generation collaborator, None when no API key is configured
    pub fn new(generator: Option<Arc<dyn Generator>>) -> Self {
        Self::with_session(create_shared_session(Session::new()), generator)
    }

    pub fn with_session(session: SharedSession, generator: Option<Arc<dyn Generator>>) -> Self {
        Self {
            session,
            generator,
            tool_router: Self::tool_router(),
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    #[tool(
        name = "create_test_case",
        description = "Create a test case from form fields. title, steps and expected are required; steps, expected, preconditions and test_data take one item per line. Returns the new case with its TC_NNN id."
    )]
    async fn create_test_case(
        &self,
        Parameters(form): Parameters<TestCaseForm>,
    ) -> Result<CallToolResult, McpError> {
        tools::create_test_case(&self.session, form).await
    }

    #[tool(
        name = "generate_test_cases",
        description = "Generate test cases with AI and append them to the workspace. Provide requirements text, a base64 document to extract requirements from, or the manual form fields as context. count is 1-50 (default 5)."
    )]
    async fn generate_test_cases(
        &self,
        Parameters(args): Parameters<GenerateTestCasesArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::generate_test_cases(&self.session, &self.generator, args).await
    }

    #[tool(
        name = "extract_document",
        description = "Extract plain text from a document (txt, pdf, docx, csv, xls, xlsx) given as base64."
    )]
    fn extract_document(
        &self,
        Parameters(args): Parameters<DocumentInput>,
    ) -> Result<CallToolResult, McpError> {
        tools::extract_document(args)
    }

    #[tool(
        name = "list_test_cases",
        description = "List every test case in the workspace, in order, with the current edit state."
    )]
    async fn list_test_cases(
        &self,
        Parameters(_): Parameters<NoArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::list_test_cases(&self.session).await
    }

    #[tool(
        name = "begin_edit",
        description = "Open a test case for editing. Returns its current values as a form. Only one edit can be open at a time."
    )]
    async fn begin_edit(
        &self,
        Parameters(args): Parameters<TestCaseIdArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::begin_edit(&self.session, args).await
    }

    #[tool(
        name = "save_edit",
        description = "Save the open edit. Keeps the id, attachments and selection; every other field is replaced."
    )]
    async fn save_edit(
        &self,
        Parameters(form): Parameters<TestCaseForm>,
    ) -> Result<CallToolResult, McpError> {
        tools::save_edit(&self.session, form).await
    }

    #[tool(name = "cancel_edit", description = "Discard the open edit.")]
    async fn cancel_edit(
        &self,
        Parameters(_): Parameters<NoArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::cancel_edit(&self.session).await
    }

    #[tool(name = "toggle_select", description = "Flip the selection of one test case.")]
    async fn toggle_select(
        &self,
        Parameters(args): Parameters<TestCaseIdArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::toggle_select(&self.session, args).await
    }

    #[tool(name = "select_all", description = "Select or deselect every test case.")]
    async fn select_all(
        &self,
        Parameters(args): Parameters<SelectAllArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::select_all(&self.session, args).await
    }

    #[tool(
        name = "delete_selected",
        description = "Delete every selected test case. Ids are never reused."
    )]
    async fn delete_selected(
        &self,
        Parameters(_): Parameters<NoArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::delete_selected(&self.session).await
    }

    #[tool(
        name = "request_automation",
        description = "Snapshot the test cases to automate: every selected case, or only the case with the given id."
    )]
    async fn request_automation(
        &self,
        Parameters(args): Parameters<RequestAutomationArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::request_automation(&self.session, args).await
    }

    #[tool(
        name = "generate_automation",
        description = "Generate Java Selenium/TestNG automation code for the requested snapshot. mode=combined produces one suite, mode=separate one class per case. Returns the generated files."
    )]
    async fn generate_automation(
        &self,
        Parameters(args): Parameters<GenerateAutomationArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::generate_automation(&self.session, &self.generator, args).await
    }

    #[tool(
        name = "export_archive",
        description = "Write the last generated automation code as zip archives into output_dir."
    )]
    async fn export_archive(
        &self,
        Parameters(args): Parameters<ExportArchiveArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::export_archive(&self.session, args).await
    }

    #[tool(
        name = "export_spreadsheet",
        description = "Write every test case to an .xlsx workbook."
    )]
    async fn export_spreadsheet(
        &self,
        Parameters(args): Parameters<ExportSpreadsheetArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::export_spreadsheet(&self.session, args).await
    }

    #[tool(
        name = "workspace_stats",
        description = "Count test cases: total, selected, and per priority."
    )]
    async fn workspace_stats(
        &self,
        Parameters(_): Parameters<NoArgs>,
    ) -> Result<CallToolResult, McpError> {
        tools::workspace_stats(&self.session).await
    }
}

#[tool_handler]
impl ServerHandler for QeSuiteMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "qe-suite".to_string(),
                title: None,
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "QE Suite MCP Server manages a test case workspace and generates test cases and Selenium automation code."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::testing::{draft, FakeGenerator};

    fn text(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|c| c.as_text().map(|t| t.text.clone()))
            .collect()
    }

    fn form(title: &str) -> TestCaseForm {
        TestCaseForm {
            title: title.to_string(),
            steps: "Open app".to_string(),
            expected: "It works".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_mcp_server_creation() {
        let server = QeSuiteMcpServer::new(None);
        assert!(server.generator.is_none());
        assert_eq!(server.get_info().server_info.name, "qe-suite");
    }

    #[tokio::test]
    async fn test_sessions_are_per_server() {
        let a = QeSuiteMcpServer::new(None);
        let b = QeSuiteMcpServer::new(None);
        a.create_test_case(Parameters(form("only in a")))
            .await
            .unwrap();

        assert_eq!(a.session().lock().await.workspace.cases().len(), 1);
        assert!(b.session().lock().await.workspace.cases().is_empty());
    }

    #[tokio::test]
    async fn test_validation_error_is_a_tool_error() {
        let server = QeSuiteMcpServer::new(None);
        let result = server
            .create_test_case(Parameters(TestCaseForm::default()))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).contains("Test Scenario"));
    }

    #[tokio::test]
    async fn test_generation_requires_api_key() {
        let server = QeSuiteMcpServer::new(None);
        let result = server
            .generate_test_cases(Parameters(GenerateTestCasesArgs {
                requirements: Some("story".to_string()),
                document: None,
                context: None,
                count: None,
                default_priority: None,
            }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).contains("qe-suite login"));
    }

    #[tokio::test]
    async fn test_generate_then_automate() {
        let generator = FakeGenerator::with_drafts(vec![draft("one"), draft("two")])
            .reply("TC_002", "// FILE: TwoTest.java\nclass TwoTest{}");
        let server = QeSuiteMcpServer::new(Some(Arc::new(generator)));

        let result = server
            .generate_test_cases(Parameters(GenerateTestCasesArgs {
                requirements: Some("story".to_string()),
                document: None,
                context: None,
                count: Some(2),
                default_priority: None,
            }))
            .await
            .unwrap();
        assert_ne!(result.is_error, Some(true));
        assert!(text(&result).contains("TC_002"));

        let result = server
            .generate_automation(Parameters(GenerateAutomationArgs { mode: None }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));

        server
            .request_automation(Parameters(RequestAutomationArgs {
                id: Some("TC_002".to_string()),
            }))
            .await
            .unwrap();
        let result = server
            .generate_automation(Parameters(GenerateAutomationArgs {
                mode: Some(crate::automation::AutomationMode::Separate),
            }))
            .await
            .unwrap();
        let body = text(&result);
        assert!(body.contains("TwoTest.java"));
        assert!(body.contains("TC_002_automation.zip"));

        let dir = tempfile::tempdir().unwrap();
        let result = server
            .export_archive(Parameters(ExportArchiveArgs {
                output_dir: dir.path().to_string_lossy().to_string(),
                key: None,
            }))
            .await
            .unwrap();
        assert_ne!(result.is_error, Some(true));
        assert!(dir.path().join("TC_002_automation.zip").exists());

        let result = server
            .export_archive(Parameters(ExportArchiveArgs {
                output_dir: dir.path().to_string_lossy().to_string(),
                key: Some("TC_001".to_string()),
            }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).contains("no result for TC_001"));
    }

    #[tokio::test]
    async fn test_export_spreadsheet_writes_file() {
        let server = QeSuiteMcpServer::new(None);
        server
            .create_test_case(Parameters(form("a")))
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.xlsx");
        let result = server
            .export_spreadsheet(Parameters(ExportSpreadsheetArgs {
                path: Some(path.to_string_lossy().to_string()),
            }))
            .await
            .unwrap();
        assert_ne!(result.is_error, Some(true));
        assert!(path.exists());
    }
}
