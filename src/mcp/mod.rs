//! MCP (Model Context Protocol) server implementation using rmcp.
//!
//! Exposes the test case workspace, generation, automation and export
//! operations as MCP tools over stdio. One server instance serves one
//! connection and owns that connection's session.

mod handlers;
mod server;
mod tools;
pub mod types;

// Re-export run_mcp_server from handlers
pub use handlers::run_mcp_server;
