//! Formatting helpers shared across MCP handlers and resources.

use crate::{
    config::Config,
    metrics::MetricsSnapshot,
    store::{ProcessingRecord, ProgressSnapshot},
};
use rmcp::model::ResourceContents;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Value, json};

pub(crate) const APPLICATION_JSON: &str = "application/json";

/// Status payload returned by the `summary-progress` tool.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProgressPayload {
    /// Document identifier.
    pub(crate) doc_id: String,
    /// Lifecycle state (`uploaded`, `processing`, `completed`, `failed`).
    pub(crate) status: String,
    /// Percentage of the current run completed.
    pub(crate) progress: u8,
}

impl ProgressPayload {
    pub(crate) fn new(doc_id: &str, snapshot: ProgressSnapshot) -> Self {
        Self {
            doc_id: doc_id.to_string(),
            status: snapshot.status.as_str().to_string(),
            progress: snapshot.progress,
        }
    }
}

/// Counter payload returned by the `metrics` tool.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MetricsPayload {
    /// Documents registered through ingestion.
    pub(crate) documents_ingested: u64,
    /// Runs started.
    pub(crate) runs_started: u64,
    /// Runs that completed.
    pub(crate) runs_completed: u64,
    /// Runs that failed.
    pub(crate) runs_failed: u64,
    /// Point lists that needed fallback synthesis.
    pub(crate) fallback_invocations: u64,
    /// Points dropped as cross-list near-duplicates.
    pub(crate) overlap_removals: u64,
}

impl From<MetricsSnapshot> for MetricsPayload {
    fn from(snapshot: MetricsSnapshot) -> Self {
        Self {
            documents_ingested: snapshot.documents_ingested,
            runs_started: snapshot.runs_started,
            runs_completed: snapshot.runs_completed,
            runs_failed: snapshot.runs_failed,
            fallback_invocations: snapshot.fallback_invocations,
            overlap_removals: snapshot.overlap_removals,
        }
    }
}

/// Digest payload shared by completed and failed `summarize-paper` calls.
pub(crate) fn digest_payload(record: &ProcessingRecord) -> Value {
    json!({
        "docId": record.doc_id,
        "status": record.status.as_str(),
        "progress": record.progress,
        "summary": record.summary,
        "advantages": record.advantages,
        "disadvantages": record.disadvantages,
        "error": record.error,
    })
}

/// Build the health payload describing the generator and pipeline counters.
///
/// `config` is absent when the server is embedded without process-level configuration.
pub(crate) fn health_payload(config: Option<&Config>, metrics: MetricsSnapshot) -> String {
    let generator = match config {
        Some(config) => json!({
            "provider": "ollama",
            "model": config.generator_model,
            "url": config.ollama_url,
            "timeoutSecs": config.generator_timeout_secs,
        }),
        None => json!({ "provider": "injected" }),
    };
    let payload = json!({
        "status": "ok",
        "generator": generator,
        "metrics": MetricsPayload::from(metrics),
    });

    serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string())
}

/// Serialize a value to JSON, falling back to compact formatting on error.
pub(crate) fn serialize_json<T: Serialize>(value: &T, context_uri: &str) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|error| {
        tracing::warn!(uri = context_uri, %error, "Failed to serialize JSON prettily");
        serde_json::to_string(value).unwrap_or_else(|_| "{}".into())
    })
}

/// Build JSON resource contents for MCP resource responses.
pub(crate) fn json_resource_contents(uri: &str, text: String) -> ResourceContents {
    ResourceContents::TextResourceContents {
        uri: uri.to_string(),
        mime_type: Some(APPLICATION_JSON.into()),
        text,
        meta: None,
    }
}
