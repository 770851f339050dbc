//! Handler for the metrics tool.

use std::sync::Arc;

use crate::{mcp::format::MetricsPayload, pipeline::DigestService};
use rmcp::{ErrorData as McpError, model::CallToolResult};

/// Handle the `metrics` tool, returning the current pipeline counters.
pub(crate) async fn handle_metrics(
    service: &Arc<DigestService>,
) -> Result<CallToolResult, McpError> {
    let payload = serde_json::to_value(MetricsPayload::from(service.metrics_snapshot()))
        .map_err(|err| McpError::internal_error(err.to_string(), None))?;
    Ok(CallToolResult::structured(payload))
}
