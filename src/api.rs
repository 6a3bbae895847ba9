// SPDX-License-Identifier: MIT OR Apache-2.0

//! Boundary-facing response shapes and status mapping.
//!
//! The engine is transport-agnostic; an external routing layer serializes
//! these DTOs and maps [`Error`] variants onto status codes. Raw embeddings
//! never appear in listing responses.

use serde::Serialize;

use crate::chunker::ChunkWindow;
use crate::errors::Error;
use crate::retriever::MatchedChunk;

/// Token accounting for an embed call (whitespace tokens).
#[derive(Debug, Clone, Serialize)]
pub struct EmbedUsage {
    pub prompt_tokens: usize,
    pub total_tokens: usize,
}

/// Result of embedding a batch of input texts.
#[derive(Debug, Clone, Serialize)]
pub struct EmbedResponse {
    pub embeddings: Vec<Vec<f32>>,
    pub usage: EmbedUsage,
}

/// Result of ingesting one document.
#[derive(Debug, Clone, Serialize)]
pub struct IngestResponse {
    pub doc_id: String,
    pub chunks_added: usize,
    pub total_chunks: usize,
    pub total_docs: usize,
}

/// One document in a listing, with its chunk texts.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentEntry {
    pub id: String,
    pub chunk_count: usize,
    pub added_at: i64,
    pub chunks: Vec<ChunkWindow>,
}

/// Full listing of ingested documents.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentList {
    pub total_docs: usize,
    pub total_chunks: usize,
    pub docs: Vec<DocumentEntry>,
}

/// Ranked results for one query.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse {
    pub query: String,
    pub results: Vec<MatchedChunk>,
}

/// Store size counters reported by health checks.
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub docs: usize,
    pub chunks: usize,
}

/// Service health snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct Health {
    /// `"ok"` once the model is ready, `"loading"` before, `"failed"` when
    /// provider initialization errored out for good.
    pub status: &'static str,
    pub model_loaded: bool,
    pub model: Option<String>,
    pub store: StoreStats,
}

/// HTTP-style status code for an error, for the boundary layer.
pub fn status_code(error: &Error) -> u16 {
    match error {
        Error::Validation(_) => 400,
        Error::NotFound(_) => 404,
        Error::ModelNotReady => 503,
        Error::Inference(_) | Error::Internal(_) => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_code(&Error::validation("bad")), 400);
        assert_eq!(status_code(&Error::NotFound("empty".into())), 404);
        assert_eq!(status_code(&Error::ModelNotReady), 503);
        assert_eq!(status_code(&Error::Inference("boom".into())), 500);
        assert_eq!(status_code(&Error::Internal("boom".into())), 500);
    }

    #[test]
    fn test_listing_has_no_embeddings_field() {
        let listing = DocumentList {
            total_docs: 1,
            total_chunks: 1,
            docs: vec![DocumentEntry {
                id: "doc".into(),
                chunk_count: 1,
                added_at: 0,
                chunks: vec![ChunkWindow {
                    index: 0,
                    text: "hello".into(),
                }],
            }],
        };
        let json = serde_json::to_string(&listing).unwrap();
        assert!(!json.contains("embedding"));
    }
}
