//! Digest service coordinating generation, extraction, and record tracking.

use crate::{
    config::{DEFAULT_MAX_DOCUMENT_CHARS, DEFAULT_SUMMARY_WORD_TARGET, get_config},
    generation::{Generator, answer_params, get_generator, points_params, summary_params},
    metrics::{MetricsSnapshot, PipelineMetrics},
    pipeline::{
        fallback::{complete_points, synthesize_points},
        normalize::normalize_text,
        overlap::resolve_overlap,
        points::{PointCategory, extract_points},
        progress::{Checkpoint, ProgressTracker},
        prompt::{
            POINTS_PER_LIST, advantages_prompt, limitations_prompt, question_prompt,
            summary_prompt,
        },
        sanitize::{
            clean_document_text, content_hash, sanitize_filename, sanitize_string, text_preview,
        },
        types::{DigestError, IngestOutcome, IngestRequest, RunOutcome},
        window::{Windows, split_windows},
    },
    store::{
        Document, DocumentStore, InMemoryDocumentStore, InMemoryRecordStore, ProcessingRecord,
        ProcessingStatus, ProgressSnapshot, RecordStore, RecordUpdate,
    },
};
use async_trait::async_trait;
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use time::OffsetDateTime;
use uuid::Uuid;

/// Tunables applied by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestSettings {
    /// Word budget for normalized summaries.
    pub summary_word_target: usize,
    /// Character cap applied to ingested text.
    pub max_document_chars: usize,
}

impl Default for DigestSettings {
    fn default() -> Self {
        Self {
            summary_word_target: DEFAULT_SUMMARY_WORD_TARGET,
            max_document_chars: DEFAULT_MAX_DOCUMENT_CHARS,
        }
    }
}

/// Runs the digest pipeline and the surrounding document operations.
///
/// The service owns long-lived handles to the generator, both stores, and the metrics registry
/// so that the HTTP surface, the MCP tools, and the CLI share the same components. Construct it
/// once near process start and share it through an `Arc`.
pub struct DigestService {
    generator: Arc<dyn Generator>,
    documents: Arc<dyn DocumentStore>,
    records: Arc<dyn RecordStore>,
    metrics: Arc<PipelineMetrics>,
    settings: DigestSettings,
}

/// Abstraction over the digest service used by external surfaces (HTTP, MCP).
#[async_trait]
pub trait DigestApi: Send + Sync {
    /// Register already extracted text for `owner_id`.
    async fn ingest(&self, request: IngestRequest) -> Result<IngestOutcome, DigestError>;

    /// Run the full pipeline for one document.
    async fn run(&self, doc_id: &str) -> Result<RunOutcome, DigestError>;

    /// Read the current status and progress of a document.
    async fn get_progress(&self, doc_id: &str) -> Result<ProgressSnapshot, DigestError>;

    /// Answer a free-form question about a document.
    async fn ask(&self, doc_id: &str, question: &str) -> Result<String, DigestError>;

    /// List the records owned by `owner_id`, newest upload first.
    async fn history(&self, owner_id: &str) -> Result<Vec<ProcessingRecord>, DigestError>;

    /// Fetch one record, scoped to its owner.
    async fn document(
        &self,
        doc_id: &str,
        owner_id: &str,
    ) -> Result<ProcessingRecord, DigestError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl DigestService {
    /// Build a service from the global configuration with in-memory stores.
    pub fn new() -> Self {
        let config = get_config();
        tracing::info!(model = %config.generator_model, "Initializing generator");
        let settings = DigestSettings {
            summary_word_target: config.summary_word_target,
            max_document_chars: config.max_document_chars,
        };
        Self::with_components(
            get_generator(),
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(InMemoryRecordStore::new()),
            settings,
        )
    }

    /// Build a service from explicit collaborators.
    pub fn with_components(
        generator: Arc<dyn Generator>,
        documents: Arc<dyn DocumentStore>,
        records: Arc<dyn RecordStore>,
        settings: DigestSettings,
    ) -> Self {
        Self {
            generator,
            documents,
            records,
            metrics: Arc::new(PipelineMetrics::new()),
            settings,
        }
    }

    /// Clean, deduplicate, and store a document with an `uploaded` record.
    pub async fn ingest(&self, request: IngestRequest) -> Result<IngestOutcome, DigestError> {
        let IngestRequest {
            text,
            filename,
            owner_id,
        } = request;
        let owner_id = sanitize_string(Some(owner_id))
            .ok_or_else(|| DigestError::InvalidRequest("owner_id is required".into()))?;
        let cleaned = clean_document_text(&text, self.settings.max_document_chars);
        if cleaned.is_empty() {
            return Err(DigestError::InvalidRequest(
                "Document contains no extractable text".into(),
            ));
        }
        let filename = sanitize_filename(filename);
        let hash = content_hash(&cleaned);

        if let Some(existing) = self
            .documents
            .find_by_content_hash(&owner_id, &hash)
            .await?
        {
            let filename = self
                .documents
                .get(&existing)
                .await?
                .map(|document| document.filename)
                .unwrap_or(filename);
            tracing::info!(doc_id = %existing, owner_id = %owner_id, "Duplicate document reused");
            return Ok(IngestOutcome {
                doc_id: existing,
                filename,
                deduplicated: true,
            });
        }

        let doc_id = Uuid::new_v4().to_string();
        let now = OffsetDateTime::now_utc();
        let preview = text_preview(&cleaned);
        let chars = cleaned.chars().count();
        self.documents
            .insert(Document {
                doc_id: doc_id.clone(),
                raw_text: cleaned,
                filename: filename.clone(),
                owner_id: owner_id.clone(),
                content_hash: hash,
                uploaded_at: now,
            })
            .await?;
        self.records
            .upsert(
                &doc_id,
                RecordUpdate {
                    filename: Some(filename.clone()),
                    owner_id: Some(owner_id.clone()),
                    text_preview: Some(preview),
                    status: Some(ProcessingStatus::Uploaded),
                    progress: Some(0),
                    uploaded_at: Some(now),
                    last_updated: Some(now),
                    ..RecordUpdate::default()
                },
            )
            .await?;
        self.metrics.record_ingest();
        tracing::info!(doc_id = %doc_id, owner_id = %owner_id, %filename, chars, "Document ingested");

        Ok(IngestOutcome {
            doc_id,
            filename,
            deduplicated: false,
        })
    }

    /// Run every stage for `doc_id` and persist the outcome.
    ///
    /// Returns `Err` only when the document is unknown or the run could not be started; any
    /// failure after that ends in a persisted `failed` record and [`RunOutcome::Failed`].
    pub async fn run(&self, doc_id: &str) -> Result<RunOutcome, DigestError> {
        let document = self
            .documents
            .get(doc_id)
            .await?
            .ok_or_else(|| DigestError::NotFound(doc_id.to_string()))?;

        let mut tracker = ProgressTracker::begin(self.records.clone(), doc_id).await?;
        self.metrics.record_run_started();
        tracing::info!(
            doc_id,
            filename = %document.filename,
            chars = document.raw_text.chars().count(),
            "Digest run started"
        );

        let stages = AssertUnwindSafe(self.execute_stages(&document, &mut tracker))
            .catch_unwind()
            .await;
        let reason = match stages {
            Ok(Ok(record)) => {
                self.metrics.record_run_completed();
                tracing::info!(
                    doc_id,
                    advantages = record.advantages.len(),
                    disadvantages = record.disadvantages.len(),
                    "Digest run completed"
                );
                return Ok(RunOutcome::Completed(record));
            }
            Ok(Err(err)) => err.to_string(),
            Err(panic) => format!("Pipeline stage panicked: {}", panic_message(panic.as_ref())),
        };

        let record = tracker.fail(&reason).await;
        self.metrics.record_run_failed();
        tracing::error!(doc_id, progress = record.progress, error = %reason, "Digest run failed");
        Ok(RunOutcome::Failed { reason, record })
    }

    async fn execute_stages(
        &self,
        document: &Document,
        tracker: &mut ProgressTracker,
    ) -> Result<ProcessingRecord, DigestError> {
        let windows = split_windows(&document.raw_text);
        tracker.checkpoint(Checkpoint::Windowed).await?;

        let prompt = summary_prompt(&document.filename, &windows);
        let raw_summary = self.generator.generate(&prompt, &summary_params()).await?;
        let summary = normalize_text(&raw_summary, self.settings.summary_word_target);
        tracker.checkpoint(Checkpoint::Summarized).await?;

        let advantages = self
            .collect_points(PointCategory::Advantage, &windows)
            .await?;
        tracker.checkpoint(Checkpoint::AdvantagesExtracted).await?;

        let limitations = self
            .collect_points(PointCategory::Limitation, &windows)
            .await?;

        let before = advantages.len() + limitations.len();
        let (advantages, limitations) = resolve_overlap(advantages, limitations);
        let removed = before - advantages.len() - limitations.len();
        if removed > 0 {
            self.metrics.record_overlap_removals(removed as u64);
        }

        let record = tracker.complete(summary, advantages, limitations).await?;
        Ok(record)
    }

    async fn collect_points(
        &self,
        category: PointCategory,
        windows: &Windows<'_>,
    ) -> Result<Vec<String>, DigestError> {
        let prompt = match category {
            PointCategory::Advantage => advantages_prompt(windows),
            PointCategory::Limitation => limitations_prompt(windows),
        };
        let raw = self.generator.generate(&prompt, &points_params()).await?;
        let extracted = extract_points(&raw, category);
        if extracted.len() >= POINTS_PER_LIST {
            return Ok(extracted);
        }

        self.metrics.record_fallback();
        tracing::debug!(
            %category,
            extracted = extracted.len(),
            "Topping up points with synthesized fallbacks"
        );
        Ok(complete_points(
            extracted,
            synthesize_points(category, windows),
        ))
    }

    /// Read status and progress straight from the record store.
    pub async fn get_progress(&self, doc_id: &str) -> Result<ProgressSnapshot, DigestError> {
        self.records
            .get(doc_id)
            .await?
            .map(|record| record.progress_snapshot())
            .ok_or_else(|| DigestError::NotFound(doc_id.to_string()))
    }

    /// Answer `question` from the opening of the document.
    pub async fn ask(&self, doc_id: &str, question: &str) -> Result<String, DigestError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(DigestError::InvalidRequest("question is required".into()));
        }
        let document = self
            .documents
            .get(doc_id)
            .await?
            .ok_or_else(|| DigestError::NotFound(doc_id.to_string()))?;

        let prompt = question_prompt(question, &document.raw_text);
        let answer = self.generator.generate(&prompt, &answer_params()).await?;
        tracing::debug!(doc_id, answer_chars = answer.len(), "Question answered");
        Ok(answer.trim().to_string())
    }

    /// List the records owned by `owner_id`, newest upload first.
    pub async fn history(&self, owner_id: &str) -> Result<Vec<ProcessingRecord>, DigestError> {
        let owner_id = sanitize_string(Some(owner_id.to_string()))
            .ok_or_else(|| DigestError::InvalidRequest("owner_id is required".into()))?;
        Ok(self.records.list_by_owner(&owner_id).await?)
    }

    /// Fetch one record if it belongs to `owner_id`.
    pub async fn document(
        &self,
        doc_id: &str,
        owner_id: &str,
    ) -> Result<ProcessingRecord, DigestError> {
        self.records
            .get(doc_id)
            .await?
            .filter(|record| record.owner_id.as_deref() == Some(owner_id.trim()))
            .ok_or_else(|| DigestError::NotFound(doc_id.to_string()))
    }

    /// Retrieve the current metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

#[async_trait]
impl DigestApi for DigestService {
    async fn ingest(&self, request: IngestRequest) -> Result<IngestOutcome, DigestError> {
        DigestService::ingest(self, request).await
    }

    async fn run(&self, doc_id: &str) -> Result<RunOutcome, DigestError> {
        DigestService::run(self, doc_id).await
    }

    async fn get_progress(&self, doc_id: &str) -> Result<ProgressSnapshot, DigestError> {
        DigestService::get_progress(self, doc_id).await
    }

    async fn ask(&self, doc_id: &str, question: &str) -> Result<String, DigestError> {
        DigestService::ask(self, doc_id, question).await
    }

    async fn history(&self, owner_id: &str) -> Result<Vec<ProcessingRecord>, DigestError> {
        DigestService::history(self, owner_id).await
    }

    async fn document(
        &self,
        doc_id: &str,
        owner_id: &str,
    ) -> Result<ProcessingRecord, DigestError> {
        DigestService::document(self, doc_id, owner_id).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        DigestService::metrics_snapshot(self)
    }
}
