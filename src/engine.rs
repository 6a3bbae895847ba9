// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engine facade tying chunking, embedding, storage, and retrieval together.
//!
//! One [`Engine`] is constructed per process and shared across request
//! threads. Chunking and embedding run outside every lock; the write to the
//! chunk store and the matching registry record execute inside the
//! per-document critical section, so a failed ingest commits nothing and a
//! completed one is observed wholesale.

use std::sync::{Arc, PoisonError};

use tracing::{debug, info};
use uuid::Uuid;

use crate::api::{
    DocumentEntry, DocumentList, EmbedResponse, EmbedUsage, Health, IngestResponse, MatchResponse,
    StoreStats,
};
use crate::chunker::{ChunkConfig, ChunkWindow, WordChunker};
use crate::embedding::{ModelHandle, ModelState};
use crate::errors::{Error, Result};
use crate::retriever::{Retriever, DEFAULT_TOP_K};
use crate::store::{ChunkInput, ChunkStore, DocLocks, DocumentRegistry};

/// Parameters of one ingest call.
#[derive(Debug, Clone, Default)]
pub struct IngestRequest {
    /// Document id; generated when absent.
    pub id: Option<String>,
    /// Raw document text.
    pub text: String,
    /// Words per chunk; engine default when absent.
    pub chunk_words: Option<usize>,
    /// Overlapping words between chunks; engine default when absent.
    pub overlap_words: Option<usize>,
}

/// Shared retrieval engine.
pub struct Engine {
    model: Arc<ModelHandle>,
    store: ChunkStore,
    documents: DocumentRegistry,
    doc_locks: DocLocks,
    chunk_defaults: ChunkConfig,
}

impl Engine {
    /// Creates an engine with default chunking parameters.
    pub fn new(model: Arc<ModelHandle>) -> Self {
        Self::with_chunk_defaults(model, ChunkConfig::default())
    }

    /// Creates an engine with custom default chunking parameters.
    pub fn with_chunk_defaults(model: Arc<ModelHandle>, chunk_defaults: ChunkConfig) -> Self {
        Self {
            model,
            store: ChunkStore::new(),
            documents: DocumentRegistry::new(),
            doc_locks: DocLocks::new(),
            chunk_defaults,
        }
    }

    /// The embedding model handle backing this engine.
    pub fn model(&self) -> &ModelHandle {
        &self.model
    }

    /// Embeds a batch of texts and reports whitespace-token usage.
    pub fn embed(&self, inputs: &[String]) -> Result<EmbedResponse> {
        if inputs.is_empty() {
            return Err(Error::validation("no input texts"));
        }

        let embeddings = self.model.embed(inputs)?;
        let prompt_tokens = inputs
            .iter()
            .map(|text| text.split_whitespace().count())
            .sum();

        Ok(EmbedResponse {
            embeddings,
            usage: EmbedUsage {
                prompt_tokens,
                total_tokens: prompt_tokens,
            },
        })
    }

    /// Chunks, embeds, and stores one document, replacing any previous
    /// ingest under the same id.
    pub fn ingest(&self, request: IngestRequest) -> Result<IngestResponse> {
        let config = ChunkConfig::new(
            request.chunk_words.unwrap_or(self.chunk_defaults.chunk_words),
            request
                .overlap_words
                .unwrap_or(self.chunk_defaults.overlap_words),
        )?;

        let windows = WordChunker::new(config).chunk_text(&request.text)?;
        let texts: Vec<String> = windows.iter().map(|w| w.text.clone()).collect();
        let embeddings = self.model.embed(&texts)?;
        if embeddings.len() != windows.len() {
            return Err(Error::Internal(format!(
                "provider returned {} embeddings for {} chunks",
                embeddings.len(),
                windows.len()
            )));
        }

        let doc_id = request
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let chunks: Vec<ChunkInput> = windows
            .into_iter()
            .zip(embeddings)
            .map(|(window, embedding)| ChunkInput {
                index: window.index,
                text: window.text,
                embedding,
            })
            .collect();
        let chunks_added = chunks.len();

        // Store write and registry record form one per-document critical
        // section; concurrent re-ingests of this id queue up here. The
        // response totals are read inside it too, so they reflect a state
        // in which this ingest's own generation is the one stored.
        let (total_chunks, total_docs) = {
            let lock = self.doc_locks.for_doc(&doc_id);
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.store.upsert(&doc_id, chunks);
            self.documents.record(&doc_id, chunks_added);
            (self.store.len(), self.documents.count())
        };

        info!(doc_id = %doc_id, chunks = chunks_added, "ingested document");

        Ok(IngestResponse {
            doc_id,
            chunks_added,
            total_chunks,
            total_docs,
        })
    }

    /// Ranks stored chunks against `query`.
    pub fn match_query(
        &self,
        query: &str,
        top_k: Option<usize>,
        include_context: Option<bool>,
    ) -> Result<MatchResponse> {
        let retriever = Retriever::new(&self.model, &self.store);
        let results = retriever.match_query(
            query,
            top_k.unwrap_or(DEFAULT_TOP_K),
            include_context.unwrap_or(true),
        )?;
        debug!(query_words = query.split_whitespace().count(), results = results.len(), "match served");

        Ok(MatchResponse {
            query: query.to_string(),
            results,
        })
    }

    /// Lists every ingested document with its chunk texts. Embeddings are
    /// never included.
    pub fn list_documents(&self) -> DocumentList {
        let docs: Vec<DocumentEntry> = self
            .documents
            .list()
            .into_iter()
            .map(|doc| {
                let chunks = self
                    .store
                    .chunks_for(&doc.id)
                    .into_iter()
                    .map(|(index, text)| ChunkWindow { index, text })
                    .collect();
                DocumentEntry {
                    id: doc.id,
                    chunk_count: doc.chunk_count,
                    added_at: doc.added_at,
                    chunks,
                }
            })
            .collect();

        DocumentList {
            total_docs: self.documents.count(),
            total_chunks: self.store.len(),
            docs,
        }
    }

    /// Readiness and store-size snapshot.
    ///
    /// A handle that failed to load reports `"failed"`, not `"loading"`;
    /// the failure is sticky and waiting will not resolve it.
    pub fn health(&self) -> Health {
        let state = self.model.state();
        Health {
            status: match state {
                ModelState::Ready => "ok",
                ModelState::Failed => "failed",
                ModelState::Unloaded | ModelState::Loading => "loading",
            },
            model_loaded: state == ModelState::Ready,
            model: self.model.model_id(),
            store: StoreStats {
                docs: self.documents.count(),
                chunks: self.store.len(),
            },
        }
    }
}
