//! Handler for the `summarize-paper` MCP tool.

use std::sync::Arc;

use crate::{
    mcp::format::digest_payload,
    pipeline::{DigestService, RunOutcome},
};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};
use serde::Deserialize;

use super::{map_digest_error, parse_arguments, require_doc_id};

/// Request payload accepted by the `summarize-paper` tool.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SummarizeToolRequest {
    /// Document to digest.
    pub(crate) doc_id: String,
}

/// Run the pipeline synchronously and return the digest.
///
/// A failed run is reported as a tool-level error carrying the failed record, not as a protocol
/// error, so hosts can show the reason next to the partial progress.
pub(crate) async fn handle_summarize(
    service: &Arc<DigestService>,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: SummarizeToolRequest = parse_arguments(arguments)?;
    let doc_id = require_doc_id(&args.doc_id)?;

    let outcome = service.run(doc_id).await.map_err(map_digest_error)?;
    match outcome {
        RunOutcome::Completed(record) => Ok(CallToolResult::structured(digest_payload(&record))),
        RunOutcome::Failed { record, .. } => {
            Ok(CallToolResult::structured_error(digest_payload(&record)))
        }
    }
}
