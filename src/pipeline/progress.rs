//! Per-run progress tracking on top of a [`RecordStore`].
//!
//! The tracker keeps a local mirror of the record it writes so that a failed run can still hand
//! back a coherent record when the store itself is the thing that failed.

use crate::store::{ProcessingRecord, ProcessingStatus, RecordStore, RecordUpdate, StoreError};
use std::sync::Arc;
use thiserror::Error;
use time::OffsetDateTime;

/// Persisted progress milestones of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Checkpoint {
    /// Run entered `processing`.
    Started,
    /// Windows computed.
    Windowed,
    /// Summary generated and normalized.
    Summarized,
    /// Advantages extracted or synthesized.
    AdvantagesExtracted,
    /// Everything persisted.
    Completed,
}

impl Checkpoint {
    /// Percentage written for this checkpoint.
    pub fn percent(self) -> u8 {
        match self {
            Self::Started => 0,
            Self::Windowed => 20,
            Self::Summarized => 50,
            Self::AdvantagesExtracted => 75,
            Self::Completed => 100,
        }
    }
}

/// Errors raised while advancing a run.
#[derive(Debug, Error)]
pub enum ProgressError {
    /// A checkpoint would move progress backwards.
    #[error("progress cannot regress from {from}% to {to}%")]
    Regression {
        /// Progress already persisted.
        from: u8,
        /// Rejected progress value.
        to: u8,
    },
    /// The record is not in a state that allows the requested transition.
    #[error("cannot move from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: ProcessingStatus,
        /// Requested status.
        to: ProcessingStatus,
    },
    /// Record store write failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Drives one record through `processing` to a terminal state.
pub struct ProgressTracker {
    records: Arc<dyn RecordStore>,
    doc_id: String,
    record: ProcessingRecord,
}

impl ProgressTracker {
    /// Enter `processing` at 0% and clear results left by an earlier run.
    pub async fn begin(records: Arc<dyn RecordStore>, doc_id: &str) -> Result<Self, StoreError> {
        let mut record = records
            .get(doc_id)
            .await?
            .unwrap_or_else(|| ProcessingRecord::new(doc_id));
        if record.status == ProcessingStatus::Processing {
            tracing::warn!(
                doc_id,
                progress = record.progress,
                "Starting a run while another is still processing"
            );
        }

        let now = OffsetDateTime::now_utc();
        let update = RecordUpdate {
            status: Some(ProcessingStatus::Processing),
            progress: Some(Checkpoint::Started.percent()),
            summary: Some(None),
            advantages: Some(Vec::new()),
            disadvantages: Some(Vec::new()),
            error: Some(None),
            processing_start: Some(now),
            last_updated: Some(now),
            ..RecordUpdate::default()
        };
        records.upsert(doc_id, update.clone()).await?;
        record.apply(update);
        tracing::debug!(doc_id, "Run started");

        Ok(Self {
            records,
            doc_id: doc_id.to_string(),
            record,
        })
    }

    /// Locally mirrored record.
    pub fn record(&self) -> &ProcessingRecord {
        &self.record
    }

    /// Persist an intermediate checkpoint.
    pub async fn checkpoint(&mut self, checkpoint: Checkpoint) -> Result<(), ProgressError> {
        let progress = self.check_progress(checkpoint)?;
        self.write(RecordUpdate {
            progress: Some(progress),
            ..RecordUpdate::default()
        })
        .await?;
        tracing::debug!(doc_id = %self.doc_id, progress, "Checkpoint reached");
        Ok(())
    }

    /// Persist the final results and move the record to `completed` at 100%.
    pub async fn complete(
        &mut self,
        summary: String,
        advantages: Vec<String>,
        disadvantages: Vec<String>,
    ) -> Result<ProcessingRecord, ProgressError> {
        self.check_transition(ProcessingStatus::Completed)?;
        let progress = self.check_progress(Checkpoint::Completed)?;
        self.write(RecordUpdate {
            status: Some(ProcessingStatus::Completed),
            progress: Some(progress),
            summary: Some(Some(summary)),
            advantages: Some(advantages),
            disadvantages: Some(disadvantages),
            ..RecordUpdate::default()
        })
        .await?;
        Ok(self.record.clone())
    }

    /// Move the record to `failed` with `reason`, keeping the last progress value.
    ///
    /// A store error here is logged and the mirrored record is returned regardless.
    pub async fn fail(&mut self, reason: &str) -> ProcessingRecord {
        let update = RecordUpdate {
            status: Some(ProcessingStatus::Failed),
            error: Some(Some(reason.to_string())),
            ..RecordUpdate::default()
        };
        if let Err(err) = self.write(update.clone()).await {
            tracing::error!(
                doc_id = %self.doc_id,
                error = %err,
                "Failed to persist failed state"
            );
            self.record.apply(update);
        }
        self.record.clone()
    }

    fn check_progress(&self, checkpoint: Checkpoint) -> Result<u8, ProgressError> {
        let to = checkpoint.percent();
        if to < self.record.progress {
            return Err(ProgressError::Regression {
                from: self.record.progress,
                to,
            });
        }
        Ok(to)
    }

    fn check_transition(&self, to: ProcessingStatus) -> Result<(), ProgressError> {
        let from = self.record.status;
        if from.can_transition_to(to) {
            Ok(())
        } else {
            Err(ProgressError::InvalidTransition { from, to })
        }
    }

    async fn write(&mut self, mut update: RecordUpdate) -> Result<(), StoreError> {
        update.last_updated = Some(OffsetDateTime::now_utc());
        self.records.upsert(&self.doc_id, update.clone()).await?;
        self.record.apply(update);
        Ok(())
    }
}
