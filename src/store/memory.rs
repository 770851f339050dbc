//! In-memory store implementations.
//!
//! Uses `HashMap` behind `tokio::sync::RwLock`; every operation is a single short critical
//! section, so concurrent pollers never observe a half-applied upsert.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    DocumentStore, RecordStore,
    types::{Document, ProcessingRecord, RecordUpdate, StoreError},
};

/// Document store kept in process memory.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<String, Document>>,
}

impl InMemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Whether no documents are stored.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, doc_id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self.documents.read().await.get(doc_id).cloned())
    }

    async fn insert(&self, document: Document) -> Result<(), StoreError> {
        self.documents
            .write()
            .await
            .insert(document.doc_id.clone(), document);
        Ok(())
    }

    async fn find_by_content_hash(
        &self,
        owner_id: &str,
        content_hash: &str,
    ) -> Result<Option<String>, StoreError> {
        Ok(self
            .documents
            .read()
            .await
            .values()
            .find(|doc| doc.owner_id == owner_id && doc.content_hash == content_hash)
            .map(|doc| doc.doc_id.clone()))
    }
}

/// Record store kept in process memory.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<String, ProcessingRecord>>,
}

impl InMemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn upsert(&self, doc_id: &str, update: RecordUpdate) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records
            .entry(doc_id.to_string())
            .or_insert_with(|| ProcessingRecord::new(doc_id))
            .apply(update);
        Ok(())
    }

    async fn get(&self, doc_id: &str) -> Result<Option<ProcessingRecord>, StoreError> {
        Ok(self.records.read().await.get(doc_id).cloned())
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<ProcessingRecord>, StoreError> {
        let mut records: Vec<ProcessingRecord> = self
            .records
            .read()
            .await
            .values()
            .filter(|record| record.owner_id.as_deref() == Some(owner_id))
            .cloned()
            .collect();
        records.sort_by(|left, right| {
            right
                .uploaded_at
                .cmp(&left.uploaded_at)
                .then_with(|| left.doc_id.cmp(&right.doc_id))
        });
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ProcessingStatus;
    use time::{Duration, OffsetDateTime};

    fn document(doc_id: &str, owner: &str, hash: &str) -> Document {
        Document {
            doc_id: doc_id.into(),
            raw_text: "text".into(),
            filename: "paper.txt".into(),
            owner_id: owner.into(),
            content_hash: hash.into(),
            uploaded_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[tokio::test]
    async fn upsert_creates_then_merges() {
        let store = InMemoryRecordStore::new();
        store
            .upsert(
                "doc-1",
                RecordUpdate {
                    status: Some(ProcessingStatus::Processing),
                    ..RecordUpdate::default()
                },
            )
            .await
            .expect("create");
        store
            .upsert(
                "doc-1",
                RecordUpdate {
                    progress: Some(50),
                    ..RecordUpdate::default()
                },
            )
            .await
            .expect("merge");

        let record = store.get("doc-1").await.expect("get").expect("present");
        assert_eq!(record.status, ProcessingStatus::Processing);
        assert_eq!(record.progress, 50);
        assert!(store.get("missing").await.expect("get").is_none());
    }

    #[tokio::test]
    async fn list_by_owner_orders_newest_first() {
        let store = InMemoryRecordStore::new();
        for (doc_id, owner, offset) in [("a", "u1", 0), ("b", "u1", 10), ("c", "u2", 20)] {
            store
                .upsert(
                    doc_id,
                    RecordUpdate {
                        owner_id: Some(owner.into()),
                        uploaded_at: Some(OffsetDateTime::UNIX_EPOCH + Duration::seconds(offset)),
                        ..RecordUpdate::default()
                    },
                )
                .await
                .expect("upsert");
        }

        let records = store.list_by_owner("u1").await.expect("list");
        let ids: Vec<&str> = records.iter().map(|r| r.doc_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn content_hash_lookup_is_scoped_to_owner() {
        let store = InMemoryDocumentStore::new();
        store.insert(document("d1", "u1", "h1")).await.expect("insert");

        assert_eq!(
            store.find_by_content_hash("u1", "h1").await.expect("find"),
            Some("d1".to_string())
        );
        assert!(store.find_by_content_hash("u2", "h1").await.expect("find").is_none());
        assert_eq!(store.len().await, 1);
    }
}
