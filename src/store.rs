//! Process-wide document registry.
//!
//! One record per document id, holding the search index and metadata
//! together. Records are write-once-per-key: an ingest computes its full
//! record locally and publishes it with a single insert, so a reader either
//! sees the complete record or a clean miss — never a torn half.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::index::SearchIndex;
use crate::model::DocumentMetadata;

/// A published document: index plus metadata, immutable once inserted.
#[derive(Debug)]
pub struct DocumentRecord {
    /// Lexical search index
    pub index: SearchIndex,

    /// Companion metadata
    pub metadata: DocumentMetadata,
}

/// In-memory registry keyed by document id.
///
/// Empty at process start; no persistence across restarts.
#[derive(Debug, Default)]
pub struct DocumentStore {
    records: RwLock<HashMap<String, Arc<DocumentRecord>>>,
}

impl DocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a record, replacing any previous record for the id.
    pub fn publish(&self, doc_id: impl Into<String>, record: DocumentRecord) {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        records.insert(doc_id.into(), Arc::new(record));
    }

    /// Fetch a record. Returns `None` for unknown or deleted ids.
    pub fn get(&self, doc_id: &str) -> Option<Arc<DocumentRecord>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records.get(doc_id).cloned()
    }

    /// Remove a record. Idempotent; returns whether one existed.
    pub fn remove(&self, doc_id: &str) -> bool {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        records.remove(doc_id).is_some()
    }

    /// Snapshot of all records, sorted by document id for deterministic
    /// iteration.
    pub fn snapshot(&self) -> Vec<(String, Arc<DocumentRecord>)> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        let mut entries: Vec<(String, Arc<DocumentRecord>)> = records
            .iter()
            .map(|(id, record)| (id.clone(), Arc::clone(record)))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Number of published documents.
    pub fn len(&self) -> usize {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records.len()
    }

    /// Check whether no document is published.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(title: &str) -> DocumentRecord {
        DocumentRecord {
            index: SearchIndex::build(Vec::new()),
            metadata: DocumentMetadata {
                title: title.to_string(),
                outline: Vec::new(),
                page_count: 0,
                processed_at: Utc::now(),
                filename: "test.pdf".to_string(),
            },
        }
    }

    #[test]
    fn test_publish_and_get() {
        let store = DocumentStore::new();
        assert!(store.is_empty());

        store.publish("a", record("Doc A"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a").unwrap().metadata.title, "Doc A");
        assert!(store.get("b").is_none());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = DocumentStore::new();
        store.publish("a", record("Doc A"));

        assert!(store.remove("a"));
        assert!(!store.remove("a"));
        assert!(store.get("a").is_none());
    }

    #[test]
    fn test_snapshot_sorted_by_id() {
        let store = DocumentStore::new();
        store.publish("beta", record("B"));
        store.publish("alpha", record("A"));

        let ids: Vec<String> = store.snapshot().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_reader_after_delete_gets_clean_miss() {
        let store = DocumentStore::new();
        store.publish("a", record("Doc A"));
        let held = store.get("a").unwrap();

        store.remove("a");
        // Existing handle stays valid; fresh lookups miss cleanly
        assert_eq!(held.metadata.title, "Doc A");
        assert!(store.get("a").is_none());
    }
}
