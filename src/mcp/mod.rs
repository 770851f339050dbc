//! Model Context Protocol (MCP) integration for Paper Digest.
//!
//! This module wires the digest service into an MCP server so editors and agent hosts can ingest
//! papers and request digests over stdio. The surface area consists of:
//!
//! - Tools: `ingest-document`, `summarize-paper`, `summary-progress`, `ask-paper`, and `metrics`.
//! - Resources: `mcp://health` and `mcp://usage`.
//!
//! Handlers, schemas, and formatting helpers are kept in focused submodules to make tests and
//! reviews small and targeted.

mod format;
pub mod handlers;
mod registry;
mod schemas;
mod server;

pub use server::PaperDigestMcpServer;
