use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing digest pipeline activity.
#[derive(Default)]
pub struct PipelineMetrics {
    documents_ingested: AtomicU64,
    runs_started: AtomicU64,
    runs_completed: AtomicU64,
    runs_failed: AtomicU64,
    fallback_invocations: AtomicU64,
    overlap_removals: AtomicU64,
}

impl PipelineMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly registered document.
    pub fn record_ingest(&self) {
        self.documents_ingested.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the start of a pipeline run.
    pub fn record_run_started(&self) {
        self.runs_started.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a run that reached `completed`.
    pub fn record_run_completed(&self) {
        self.runs_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a run that ended `failed`.
    pub fn record_run_failed(&self) {
        self.runs_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one category that needed synthesized points.
    pub fn record_fallback(&self) {
        self.fallback_invocations.fetch_add(1, Ordering::Relaxed);
    }

    /// Record points dropped by overlap resolution.
    pub fn record_overlap_removals(&self, removed: u64) {
        self.overlap_removals.fetch_add(removed, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_ingested: self.documents_ingested.load(Ordering::Relaxed),
            runs_started: self.runs_started.load(Ordering::Relaxed),
            runs_completed: self.runs_completed.load(Ordering::Relaxed),
            runs_failed: self.runs_failed.load(Ordering::Relaxed),
            fallback_invocations: self.fallback_invocations.load(Ordering::Relaxed),
            overlap_removals: self.overlap_removals.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of pipeline counters used for reporting.
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Documents registered through ingestion since startup.
    pub documents_ingested: u64,
    /// Pipeline runs started since startup.
    pub runs_started: u64,
    /// Runs that finished with `completed`.
    pub runs_completed: u64,
    /// Runs that finished with `failed`.
    pub runs_failed: u64,
    /// Point categories that required fallback synthesis.
    pub fallback_invocations: u64,
    /// Points removed by overlap resolution.
    pub overlap_removals: u64,
}
