//! Records persisted by the document and record stores.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use time::OffsetDateTime;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend could not be reached or rejected the operation.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// An ingested document. The text is immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Opaque unique identifier.
    pub doc_id: String,
    /// Extracted plain text.
    pub raw_text: String,
    /// Sanitized original filename.
    pub filename: String,
    /// Identifier of the uploading user.
    pub owner_id: String,
    /// Hex SHA-256 of `raw_text`.
    pub content_hash: String,
    /// Ingestion time.
    pub uploaded_at: OffsetDateTime,
}

/// Lifecycle state of a processing record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    /// Document registered, no run started.
    #[default]
    Uploaded,
    /// A pipeline run is in flight.
    Processing,
    /// Last run finished successfully.
    Completed,
    /// Last run failed.
    Failed,
}

impl ProcessingStatus {
    /// Lowercase label used in payloads and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uploaded => "uploaded",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether the state machine permits moving from `self` to `next`.
    ///
    /// A new run may start from any state; `processing → processing` is tolerated for
    /// re-invocations, which the pipeline does not serialize.
    pub fn can_transition_to(self, next: Self) -> bool {
        match next {
            Self::Processing => true,
            Self::Completed | Self::Failed => self == Self::Processing,
            Self::Uploaded => false,
        }
    }

    /// Whether a run has finished in this state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-document processing state polled by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingRecord {
    /// Document identifier.
    pub doc_id: String,
    /// Sanitized filename, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Owner of the document, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    /// Short excerpt of the document text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_preview: Option<String>,
    /// Lifecycle state.
    pub status: ProcessingStatus,
    /// Percentage of the current run completed.
    pub progress: u8,
    /// Normalized summary from the last completed run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Strengths from the last completed run.
    #[serde(default)]
    pub advantages: Vec<String>,
    /// Limitations from the last completed run.
    #[serde(default)]
    pub disadvantages: Vec<String>,
    /// Failure message from the last failed run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Ingestion time.
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub uploaded_at: Option<OffsetDateTime>,
    /// Start of the current or last run.
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub processing_start: Option<OffsetDateTime>,
    /// Time of the last write.
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<OffsetDateTime>,
}

impl ProcessingRecord {
    /// Create an empty `uploaded` record.
    pub fn new(doc_id: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            filename: None,
            owner_id: None,
            text_preview: None,
            status: ProcessingStatus::Uploaded,
            progress: 0,
            summary: None,
            advantages: Vec::new(),
            disadvantages: Vec::new(),
            error: None,
            uploaded_at: None,
            processing_start: None,
            last_updated: None,
        }
    }

    /// Apply a partial update in place; unset fields are left untouched.
    pub fn apply(&mut self, update: RecordUpdate) {
        let RecordUpdate {
            filename,
            owner_id,
            text_preview,
            status,
            progress,
            summary,
            advantages,
            disadvantages,
            error,
            uploaded_at,
            processing_start,
            last_updated,
        } = update;

        if let Some(value) = filename {
            self.filename = Some(value);
        }
        if let Some(value) = owner_id {
            self.owner_id = Some(value);
        }
        if let Some(value) = text_preview {
            self.text_preview = Some(value);
        }
        if let Some(value) = status {
            self.status = value;
        }
        if let Some(value) = progress {
            self.progress = value;
        }
        if let Some(value) = summary {
            self.summary = value;
        }
        if let Some(value) = advantages {
            self.advantages = value;
        }
        if let Some(value) = disadvantages {
            self.disadvantages = value;
        }
        if let Some(value) = error {
            self.error = value;
        }
        if let Some(value) = uploaded_at {
            self.uploaded_at = Some(value);
        }
        if let Some(value) = processing_start {
            self.processing_start = Some(value);
        }
        if let Some(value) = last_updated {
            self.last_updated = Some(value);
        }
    }

    /// Status and progress view served to pollers.
    pub fn progress_snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            status: self.status,
            progress: self.progress,
        }
    }
}

/// Partial set of record fields written by a single upsert.
///
/// `Option<Option<T>>` fields distinguish "leave as is" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordUpdate {
    /// New filename.
    pub filename: Option<String>,
    /// New owner.
    pub owner_id: Option<String>,
    /// New preview.
    pub text_preview: Option<String>,
    /// New status.
    pub status: Option<ProcessingStatus>,
    /// New progress.
    pub progress: Option<u8>,
    /// Replace or clear the summary.
    pub summary: Option<Option<String>>,
    /// Replace the advantages.
    pub advantages: Option<Vec<String>>,
    /// Replace the limitations.
    pub disadvantages: Option<Vec<String>>,
    /// Replace or clear the error.
    pub error: Option<Option<String>>,
    /// Set the ingestion time.
    pub uploaded_at: Option<OffsetDateTime>,
    /// Set the run start time.
    pub processing_start: Option<OffsetDateTime>,
    /// Set the last write time.
    pub last_updated: Option<OffsetDateTime>,
}

/// Read-only status view returned to polling clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressSnapshot {
    /// Lifecycle state.
    pub status: ProcessingStatus,
    /// Percentage complete.
    pub progress: u8,
}
