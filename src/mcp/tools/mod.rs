//! MCP tool implementations.
//!
//! Tools are grouped by the part of the workflow they drive.

mod automation;
mod cases;
mod common;
mod generation;

// Re-export tool functions
pub use automation::{export_archive, export_spreadsheet, generate_automation, request_automation};
pub use cases::{
    begin_edit, cancel_edit, create_test_case, delete_selected, list_test_cases, save_edit,
    select_all, toggle_select, workspace_stats,
};
pub use generation::{extract_document, generate_test_cases};
