//! Handler for the `ask-paper` MCP tool.

use std::sync::Arc;

use crate::pipeline::DigestService;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};
use serde::Deserialize;
use serde_json::json;

use super::{map_digest_error, parse_arguments, require_doc_id};

/// Request payload accepted by the `ask-paper` tool.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct AskToolRequest {
    /// Document the question is about.
    pub(crate) doc_id: String,
    /// Free-form question.
    pub(crate) question: String,
}

/// Answer a question grounded in the opening of the document.
pub(crate) async fn handle_ask(
    service: &Arc<DigestService>,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: AskToolRequest = parse_arguments(arguments)?;
    let doc_id = require_doc_id(&args.doc_id)?;
    let answer = service
        .ask(doc_id, &args.question)
        .await
        .map_err(map_digest_error)?;

    Ok(CallToolResult::structured(json!({
        "docId": doc_id,
        "question": args.question.trim(),
        "answer": answer,
    })))
}
