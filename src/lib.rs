#![deny(missing_docs)]

//! Core library for Paper Digest: research-paper summaries with distinct strengths and
//! limitations, served over HTTP, MCP, and a batch CLI.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Text generation capability and the Ollama adapter.
pub mod generation;
/// Structured logging and tracing setup.
pub mod logging;
/// Model Context Protocol server implementation.
pub mod mcp;
/// Pipeline counters.
pub mod metrics;
/// Digest pipeline stages and the orchestrating service.
pub mod pipeline;
/// Document and processing-record storage.
pub mod store;
