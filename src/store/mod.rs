// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory storage: chunk records, document metadata, and the per-document
//! lock table that serializes mutating operations on one document id.

pub mod chunks;
pub mod documents;

pub use chunks::{ChunkInput, ChunkStore, NeighborTexts, SearchHit};
pub use documents::{Document, DocumentRegistry};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Lock table keyed by document id.
///
/// Two concurrent ingests of the same document must not interleave their
/// replace-and-record steps; ingests of unrelated documents proceed in
/// parallel. Callers hold the returned mutex for the duration of the
/// upsert + registry-record critical section.
#[derive(Default)]
pub struct DocLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl DocLocks {
    /// Creates an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the mutex guarding `doc_id`, creating it on first use.
    pub fn for_doc(&self, doc_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks
            .entry(doc_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
