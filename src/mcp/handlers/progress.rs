//! Handler for the `summary-progress` MCP tool.

use std::sync::Arc;

use crate::{mcp::format::ProgressPayload, pipeline::DigestService};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};
use serde::Deserialize;

use super::{map_digest_error, parse_arguments, require_doc_id};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ProgressToolRequest {
    pub(crate) doc_id: String,
}

/// Return the stored status and progress of a document.
pub(crate) async fn handle_progress(
    service: &Arc<DigestService>,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: ProgressToolRequest = parse_arguments(arguments)?;
    let doc_id = require_doc_id(&args.doc_id)?;
    let snapshot = service
        .get_progress(doc_id)
        .await
        .map_err(map_digest_error)?;

    let payload = serde_json::to_value(ProgressPayload::new(doc_id, snapshot))
        .map_err(|err| McpError::internal_error(err.to_string(), None))?;
    Ok(CallToolResult::structured(payload))
}
