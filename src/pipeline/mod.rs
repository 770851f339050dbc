//! Digest pipeline: windowing, prompting, post-processing, and run orchestration.
//!
//! Leaf modules are pure functions over text; [`DigestService`] sequences them around the
//! generator and the stores and owns the failure handling for a run.

pub mod fallback;
pub mod normalize;
pub mod overlap;
pub mod points;
pub mod progress;
pub mod prompt;
pub mod sanitize;
mod service;
pub mod types;
pub mod window;

pub use progress::{Checkpoint, ProgressError, ProgressTracker};
pub use service::{DigestApi, DigestService, DigestSettings};
pub use types::{DigestError, IngestOutcome, IngestRequest, RunOutcome};
