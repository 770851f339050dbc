//! Storage collaborators used by the digest pipeline.
//!
//! The pipeline only needs two narrow interfaces: a read-mostly [`DocumentStore`] holding
//! extracted text, and a [`RecordStore`] holding per-document processing state with
//! last-writer-wins upserts. Backends must be `Send + Sync`; the in-memory implementations in
//! [`memory`] back the binaries and the tests.

pub mod memory;
pub mod types;

use async_trait::async_trait;

pub use memory::{InMemoryDocumentStore, InMemoryRecordStore};
pub use types::{
    Document, ProcessingRecord, ProcessingStatus, ProgressSnapshot, RecordUpdate, StoreError,
};

/// Source of extracted document text.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document by identifier.
    async fn get(&self, doc_id: &str) -> Result<Option<Document>, StoreError>;

    /// Register a new document.
    async fn insert(&self, document: Document) -> Result<(), StoreError>;

    /// Find a document of `owner_id` whose text hashes to `content_hash`.
    async fn find_by_content_hash(
        &self,
        owner_id: &str,
        content_hash: &str,
    ) -> Result<Option<String>, StoreError>;
}

/// Persistence for processing records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create or partially update the record for `doc_id`.
    async fn upsert(&self, doc_id: &str, update: RecordUpdate) -> Result<(), StoreError>;

    /// Fetch the record for `doc_id`.
    async fn get(&self, doc_id: &str) -> Result<Option<ProcessingRecord>, StoreError>;

    /// List all records owned by `owner_id`.
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<ProcessingRecord>, StoreError>;
}
