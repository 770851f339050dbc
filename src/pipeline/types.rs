//! Core data types and error definitions for the digest pipeline.

use super::progress::ProgressError;
use crate::{
    generation::GenerationError,
    store::{ProcessingRecord, StoreError},
};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by [`crate::pipeline::DigestService`] operations.
#[derive(Debug, Error)]
pub enum DigestError {
    /// Requested document or record does not exist (or is not visible to the caller).
    #[error("Document not found: {0}")]
    NotFound(String),
    /// Caller supplied unusable input.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// Generation backend failed.
    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),
    /// Storage backend failed.
    #[error("Store request failed: {0}")]
    Store(#[from] StoreError),
    /// Progress tracking rejected an update.
    #[error("Progress update rejected: {0}")]
    Progress(#[from] ProgressError),
}

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// All stages succeeded; the record is `completed`.
    Completed(ProcessingRecord),
    /// A stage failed; the record is `failed` with `reason` as its error.
    Failed {
        /// Human-readable failure reason.
        reason: String,
        /// Record as last written (or mirrored, if the write failed).
        record: ProcessingRecord,
    },
}

impl RunOutcome {
    /// Final record regardless of outcome.
    pub fn record(&self) -> &ProcessingRecord {
        match self {
            Self::Completed(record) => record,
            Self::Failed { record, .. } => record,
        }
    }

    /// Whether the run completed.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Already extracted document text submitted for ingestion.
#[derive(Debug, Clone)]
pub struct IngestRequest {
    /// Plain text of the document.
    pub text: String,
    /// Client-supplied filename; sanitized before storage.
    pub filename: Option<String>,
    /// Uploading user.
    pub owner_id: String,
}

/// Identifiers returned after ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestOutcome {
    /// Identifier of the stored (or previously stored) document.
    pub doc_id: String,
    /// Sanitized filename of the stored document.
    pub filename: String,
    /// Whether identical text from the same owner was already present.
    pub deduplicated: bool,
}
