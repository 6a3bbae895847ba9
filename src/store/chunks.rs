// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory chunk store with atomic per-document replace.
//!
//! Chunks are indexed by `doc_id`. An upsert builds the replacement chunk
//! list off to the side and swaps it in under a single write-lock
//! acquisition, so any concurrent reader observes either the fully-old or
//! the fully-new chunk set for a document, never a mix.
//!
//! Retrieval is a brute-force exact scan: one dot product per stored chunk
//! (embeddings are unit-length, so the dot product is the cosine
//! similarity). No index structure is maintained; at small-to-moderate
//! scale the O(N * D) scan is the accepted trade-off.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use rayon::prelude::*;

/// A chunk ready for insertion: window position, text, and its embedding.
#[derive(Debug, Clone)]
pub struct ChunkInput {
    pub index: usize,
    pub text: String,
    pub embedding: Vec<f32>,
}

#[derive(Debug)]
struct StoredChunk {
    index: usize,
    text: String,
    embedding: Vec<f32>,
    /// Global insertion sequence, used as a deterministic tie-break.
    seq: u64,
}

/// A scored retrieval hit.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// Dot product of the query vector and the chunk embedding.
    pub score: f32,
    pub doc_id: String,
    pub chunk_index: usize,
    pub text: String,
}

/// Neighbor chunk texts resolved from the same snapshot as their hit.
#[derive(Debug, Clone, Default)]
pub struct NeighborTexts {
    pub before: Option<String>,
    pub after: Option<String>,
}

#[derive(Default)]
struct StoreInner {
    docs: HashMap<String, Vec<StoredChunk>>,
    next_seq: u64,
}

/// Thread-safe in-memory collection of chunk records.
#[derive(Default)]
pub struct ChunkStore {
    inner: RwLock<StoreInner>,
}

impl ChunkStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically replaces every chunk of `doc_id` with the supplied list.
    ///
    /// Sequence numbers are assigned under the write lock, so ties in later
    /// searches resolve by insertion order across the whole store.
    pub fn upsert(&self, doc_id: &str, chunks: Vec<ChunkInput>) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        let mut replacement = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let seq = inner.next_seq;
            inner.next_seq += 1;
            replacement.push(StoredChunk {
                index: chunk.index,
                text: chunk.text,
                embedding: chunk.embedding,
                seq,
            });
        }

        inner.docs.insert(doc_id.to_string(), replacement);
    }

    /// Scores every stored chunk against `query` and returns the top
    /// `max(1, top_k)` hits, best first.
    ///
    /// Ordering is deterministic: descending score, ties broken by
    /// ascending insertion sequence (first inserted wins).
    pub fn search(&self, query: &[f32], top_k: usize) -> Vec<SearchHit> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Self::ranked(&inner, query, top_k)
            .into_iter()
            .map(|(score, doc_id, chunk)| SearchHit {
                score,
                doc_id: doc_id.clone(),
                chunk_index: chunk.index,
                text: chunk.text.clone(),
            })
            .collect()
    }

    /// Like [`search`](Self::search), but also resolves each hit's
    /// `index - 1` and `index + 1` neighbor texts.
    ///
    /// Hits and neighbors come from one read-lock acquisition, so a
    /// neighbor always belongs to the same ingest generation as its hit
    /// even while the document is being replaced concurrently.
    pub fn search_with_context(
        &self,
        query: &[f32],
        top_k: usize,
    ) -> Vec<(SearchHit, NeighborTexts)> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Self::ranked(&inner, query, top_k)
            .into_iter()
            .map(|(score, doc_id, chunk)| {
                let neighbors = NeighborTexts {
                    before: chunk
                        .index
                        .checked_sub(1)
                        .and_then(|i| Self::chunk_text(&inner, doc_id, i)),
                    after: Self::chunk_text(&inner, doc_id, chunk.index + 1),
                };
                let hit = SearchHit {
                    score,
                    doc_id: doc_id.clone(),
                    chunk_index: chunk.index,
                    text: chunk.text.clone(),
                };
                (hit, neighbors)
            })
            .collect()
    }

    fn ranked<'a>(
        inner: &'a StoreInner,
        query: &[f32],
        top_k: usize,
    ) -> Vec<(f32, &'a String, &'a StoredChunk)> {
        let candidates: Vec<(&String, &StoredChunk)> = inner
            .docs
            .iter()
            .flat_map(|(doc_id, chunks)| chunks.iter().map(move |chunk| (doc_id, chunk)))
            .collect();

        let mut scored: Vec<(f32, u64, &String, &StoredChunk)> = candidates
            .par_iter()
            .map(|(doc_id, chunk)| (dot(query, &chunk.embedding), chunk.seq, *doc_id, *chunk))
            .collect();

        scored.sort_unstable_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });
        scored.truncate(top_k.max(1));

        scored
            .into_iter()
            .map(|(score, _, doc_id, chunk)| (score, doc_id, chunk))
            .collect()
    }

    fn chunk_text(inner: &StoreInner, doc_id: &str, index: usize) -> Option<String> {
        inner
            .docs
            .get(doc_id)?
            .iter()
            .find(|chunk| chunk.index == index)
            .map(|chunk| chunk.text.clone())
    }

    /// `(index, text)` pairs of a document's chunks in window order.
    pub fn chunks_for(&self, doc_id: &str) -> Vec<(usize, String)> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .docs
            .get(doc_id)
            .map(|chunks| {
                chunks
                    .iter()
                    .map(|chunk| (chunk.index, chunk.text.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of chunks stored for a document.
    pub fn doc_chunk_count(&self, doc_id: &str) -> usize {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.docs.get(doc_id).map(Vec::len).unwrap_or(0)
    }

    /// Total number of chunks across all documents.
    pub fn len(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.docs.values().map(Vec::len).sum()
    }

    /// True when no chunks are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
