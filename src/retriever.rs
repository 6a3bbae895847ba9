// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query-side orchestration: embed the query, rank chunks, stitch context.

use serde::Serialize;
use tracing::debug;

use crate::embedding::ModelHandle;
use crate::errors::{Error, Result};
use crate::store::ChunkStore;

/// Default number of results returned by a match.
pub const DEFAULT_TOP_K: usize = 3;

/// Neighboring chunk texts attached to a hit.
///
/// A side is omitted when the neighbor does not exist (the hit is the first
/// or last chunk of its document).
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChunkContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

/// One ranked retrieval result.
#[derive(Debug, Clone, Serialize)]
pub struct MatchedChunk {
    pub score: f32,
    pub doc_id: String,
    pub chunk_index: usize,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ChunkContext>,
}

/// Ranks stored chunks against a free-text query.
pub struct Retriever<'a> {
    model: &'a ModelHandle,
    store: &'a ChunkStore,
}

impl<'a> Retriever<'a> {
    pub fn new(model: &'a ModelHandle, store: &'a ChunkStore) -> Self {
        Self { model, store }
    }

    /// Returns the `top_k` most similar chunks, best first.
    ///
    /// Fails with a validation error on an empty query and with `NotFound`
    /// when the store holds no chunks at all. With `include_context`, each
    /// hit carries the texts of its immediate neighbor windows.
    pub fn match_query(
        &self,
        query: &str,
        top_k: usize,
        include_context: bool,
    ) -> Result<Vec<MatchedChunk>> {
        if query.trim().is_empty() {
            return Err(Error::validation("empty query"));
        }
        if self.store.is_empty() {
            return Err(Error::NotFound("no chunks in store".to_string()));
        }

        let mut vectors = self.model.embed(&[query.to_string()])?;
        let query_vector = vectors
            .pop()
            .ok_or_else(|| Error::Internal("provider returned no embedding".to_string()))?;

        // Neighbor texts must come from the same store snapshot as the hits
        // themselves, or a concurrent re-ingest could stitch a hit with
        // context from a different generation of its document.
        let results: Vec<MatchedChunk> = if include_context {
            self.store
                .search_with_context(&query_vector, top_k)
                .into_iter()
                .map(|(hit, neighbors)| MatchedChunk {
                    score: hit.score,
                    doc_id: hit.doc_id,
                    chunk_index: hit.chunk_index,
                    text: hit.text,
                    context: Some(ChunkContext {
                        before: neighbors.before,
                        after: neighbors.after,
                    }),
                })
                .collect()
        } else {
            self.store
                .search(&query_vector, top_k)
                .into_iter()
                .map(|hit| MatchedChunk {
                    score: hit.score,
                    doc_id: hit.doc_id,
                    chunk_index: hit.chunk_index,
                    text: hit.text,
                    context: None,
                })
                .collect()
        };
        debug!(hits = results.len(), top_k, "ranked query against store");

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::{HashEmbedder, ModelHandle};
    use crate::store::{ChunkInput, ChunkStore};

    fn ready_model() -> ModelHandle {
        ModelHandle::ready(Box::new(HashEmbedder::default()))
    }

    fn store_with_doc(model: &ModelHandle, doc_id: &str, texts: &[&str]) -> ChunkStore {
        let store = ChunkStore::new();
        let owned: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
        let embeddings = model.embed(&owned).unwrap();
        let chunks = owned
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(index, (text, embedding))| ChunkInput {
                index,
                text,
                embedding,
            })
            .collect();
        store.upsert(doc_id, chunks);
        store
    }

    #[test]
    fn test_empty_query_rejected() {
        let model = ready_model();
        let store = store_with_doc(&model, "doc", &["some text"]);
        let retriever = Retriever::new(&model, &store);
        assert!(matches!(
            retriever.match_query("  ", 3, true),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_empty_store_is_not_found() {
        let model = ready_model();
        let store = ChunkStore::new();
        let retriever = Retriever::new(&model, &store);
        assert!(matches!(
            retriever.match_query("anything", 3, true),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_model_not_ready_propagates() {
        let model = ModelHandle::unloaded();
        let store = ChunkStore::new();
        store.upsert(
            "doc",
            vec![ChunkInput {
                index: 0,
                text: "text".to_string(),
                embedding: vec![1.0],
            }],
        );
        let retriever = Retriever::new(&model, &store);
        assert!(matches!(
            retriever.match_query("anything", 3, true),
            Err(Error::ModelNotReady)
        ));
    }

    #[test]
    fn test_exact_match_ranks_first() {
        let model = ready_model();
        let store = store_with_doc(
            &model,
            "doc",
            &["alpha beta gamma", "delta epsilon zeta", "eta theta iota"],
        );
        let retriever = Retriever::new(&model, &store);

        let results = retriever
            .match_query("delta epsilon zeta", 3, false)
            .unwrap();
        assert_eq!(results[0].chunk_index, 1);
        assert!((results[0].score - 1.0).abs() < 1e-6);
        assert!(results[0].context.is_none());
    }

    #[test]
    fn test_context_stitching_edges_and_middle() {
        let model = ready_model();
        let texts = ["zero zero", "one one", "two two", "three three", "four four"];
        let store = store_with_doc(&model, "doc", &texts);
        let retriever = Retriever::new(&model, &store);

        let first = &retriever.match_query("zero zero", 1, true).unwrap()[0];
        assert_eq!(first.chunk_index, 0);
        let context = first.context.as_ref().unwrap();
        assert!(context.before.is_none());
        assert_eq!(context.after.as_deref(), Some("one one"));

        let middle = &retriever.match_query("two two", 1, true).unwrap()[0];
        assert_eq!(middle.chunk_index, 2);
        let context = middle.context.as_ref().unwrap();
        assert_eq!(context.before.as_deref(), Some("one one"));
        assert_eq!(context.after.as_deref(), Some("three three"));

        let last = &retriever.match_query("four four", 1, true).unwrap()[0];
        assert_eq!(last.chunk_index, 4);
        let context = last.context.as_ref().unwrap();
        assert_eq!(context.before.as_deref(), Some("three three"));
        assert!(context.after.is_none());
    }

    #[test]
    fn test_context_serialization_omits_missing_sides() {
        let context = ChunkContext {
            before: None,
            after: Some("next".to_string()),
        };
        let json = serde_json::to_value(&context).unwrap();
        assert!(json.get("before").is_none());
        assert_eq!(json["after"], "next");
    }
}
