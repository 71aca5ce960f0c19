//! MCP server handlers.
//!
//! This module contains only the MCP server startup logic.
//! Credentials are resolved in main.rs.

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::generation::Generator;

use super::server::QeSuiteMcpServer;

/// Run the MCP server over stdio.
///
/// # Arguments
/// * `generator` - Generation collaborator (None when no API key is configured;
///   the workspace tools still work)
pub async fn run_mcp_server(generator: Option<Arc<dyn Generator>>) -> Result<()> {
    info!("🔧 Starting QE Suite MCP Tool Server...");
    info!("📝 Stdio mode (using rmcp)");

    if generator.is_none() {
        warn!("No API key configured; generation tools are disabled until 'qe-suite login'");
    }

    let server = QeSuiteMcpServer::new(generator);

    run_server(server).await
}

/// Run the MCP server with the given server instance.
async fn run_server(server: QeSuiteMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("✅ MCP tool server started");
    info!("🔗 Ready for MCP client connections");

    // Start the service
    let service = server.serve(stdio()).await.map_err(|e| {
        error!("Failed to start MCP service: {:?}", e);
        anyhow::anyhow!("Failed to start MCP service: {:?}", e)
    })?;

    // Wait for service to complete
    service.waiting().await.map_err(|e| {
        error!("MCP service error: {:?}", e);
        anyhow::anyhow!("MCP service error: {:?}", e)
    })?;

    info!("MCP server shutting down");
    Ok(())
}
