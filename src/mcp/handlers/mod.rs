//! Tool handlers for the MCP server.

use crate::pipeline::DigestError;
use rmcp::{ErrorData as McpError, model::JsonObject};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub mod ask;
pub mod ingest;
pub mod metrics;
pub mod progress;
pub mod summarize;

/// Parse structured arguments supplied to a tool invocation.
pub(crate) fn parse_arguments<T: DeserializeOwned>(
    arguments: Option<JsonObject>,
) -> Result<T, McpError> {
    let value = arguments
        .map(Value::Object)
        .unwrap_or_else(|| Value::Object(JsonObject::new()));
    serde_json::from_value(value)
        .map_err(|err| McpError::invalid_params(format!("Invalid arguments: {err}"), None))
}

/// Reject blank `doc_id` values before they reach the service.
pub(crate) fn require_doc_id(doc_id: &str) -> Result<&str, McpError> {
    let trimmed = doc_id.trim();
    if trimmed.is_empty() {
        return Err(McpError::invalid_params("`doc_id` must not be empty", None));
    }
    Ok(trimmed)
}

/// Translate service errors into MCP error codes.
pub(crate) fn map_digest_error(error: DigestError) -> McpError {
    match error {
        DigestError::NotFound(doc_id) => {
            McpError::resource_not_found(format!("Document not found: {doc_id}"), None)
        }
        DigestError::InvalidRequest(message) => McpError::invalid_params(message, None),
        other => {
            tracing::error!(error = %other, "Digest tool failed");
            McpError::internal_error(other.to_string(), None)
        }
    }
}
