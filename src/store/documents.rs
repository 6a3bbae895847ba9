// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-document metadata registry.
//!
//! Tracks which documents have been ingested, how many chunks each produced,
//! and when. Metadata is inserted-or-overwritten wholesale together with the
//! matching chunk upsert (the engine serializes both per document), so the
//! recorded `chunk_count` always reflects one completed ingest.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

/// Metadata for one ingested document.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: String,
    pub chunk_count: usize,
    /// Unix timestamp (seconds) of the most recent ingest.
    pub added_at: i64,
}

#[derive(Default)]
struct RegistryInner {
    docs: HashMap<String, Document>,
    /// First-recorded order; re-ingesting keeps a document's position.
    order: Vec<String>,
}

/// Thread-safe registry of ingested documents.
#[derive(Default)]
pub struct DocumentRegistry {
    inner: RwLock<RegistryInner>,
}

impl DocumentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a document's metadata with the current time.
    pub fn record(&self, doc_id: &str, chunk_count: usize) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if !inner.docs.contains_key(doc_id) {
            inner.order.push(doc_id.to_string());
        }
        inner.docs.insert(
            doc_id.to_string(),
            Document {
                id: doc_id.to_string(),
                chunk_count,
                added_at: now_unix(),
            },
        );
    }

    /// Metadata for a single document.
    pub fn get(&self, doc_id: &str) -> Option<Document> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.docs.get(doc_id).cloned()
    }

    /// All documents in first-recorded order.
    pub fn list(&self) -> Vec<Document> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .order
            .iter()
            .filter_map(|id| inner.docs.get(id).cloned())
            .collect()
    }

    /// Number of registered documents.
    pub fn count(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.docs.len()
    }
}

fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
