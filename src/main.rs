use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use workspace_mcp::config::{CliArgs, ServerConfig};
use workspace_mcp::server::WorkspaceServer;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr: stdout carries the MCP stdio transport.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("workspace_mcp=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let config = Arc::new(ServerConfig::from_args(args)?);
    tracing::info!("starting workspace-mcp on stdio");

    let server = WorkspaceServer::new(config)?;
    server.run().await
}
