//! MCP handler for document ingestion.

use std::sync::Arc;

use crate::pipeline::{DigestService, IngestRequest};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};
use serde::Deserialize;
use serde_json::json;

use super::{map_digest_error, parse_arguments};

/// Request payload accepted by the `ingest-document` tool.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct IngestToolRequest {
    /// Plain text already extracted from the paper.
    pub(crate) text: String,
    /// Optional original filename.
    #[serde(default)]
    pub(crate) filename: Option<String>,
    /// Owner of the document.
    pub(crate) owner_id: String,
}

/// Handle the `ingest-document` tool by registering the text and its `uploaded` record.
pub(crate) async fn handle_ingest(
    service: &Arc<DigestService>,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: IngestToolRequest = parse_arguments(arguments)?;
    if args.text.trim().is_empty() {
        return Err(McpError::invalid_params("`text` must not be empty", None));
    }

    let IngestToolRequest {
        text,
        filename,
        owner_id,
    } = args;
    let outcome = service
        .ingest(IngestRequest {
            text,
            filename,
            owner_id,
        })
        .await
        .map_err(map_digest_error)?;

    Ok(CallToolResult::structured(json!({
        "status": "ok",
        "docId": outcome.doc_id,
        "filename": outcome.filename,
        "deduplicated": outcome.deduplicated,
    })))
}
