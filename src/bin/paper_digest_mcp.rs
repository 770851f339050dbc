//! MCP server entrypoint (stdio transport).
//!
//! Launches an MCP server that exposes Paper Digest's tools and resources over stdio. This mode
//! is designed for editor/agent integrations and shares all runtime configuration with the HTTP
//! binary. Console logs go to stderr because stdout carries the protocol.
use anyhow::{Context, Result};
use paper_digest::{
    config,
    logging::{self, ConsoleStream},
    mcp::PaperDigestMcpServer,
    pipeline::DigestService,
};
use rmcp::{service::ServiceExt, transport::stdio};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    config::init_config();
    logging::init_tracing_with(ConsoleStream::Stderr);

    let service = Arc::new(DigestService::new());
    let server = PaperDigestMcpServer::new(service);

    let running = server
        .serve(stdio())
        .await
        .context("failed to start MCP server over stdio")?;

    running
        .waiting()
        .await
        .context("MCP server terminated unexpectedly")?;

    Ok(())
}
