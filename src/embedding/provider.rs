// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding provider interface and implementations.
//!
//! Providers turn batches of texts into fixed-dimension unit vectors. The
//! builtin provider is fastembed (all-MiniLM-L6-v2); a deterministic
//! hash-based provider is available for offline runs and tests.

use std::borrow::Cow;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::errors::{Error, Result};

/// Embedding dimension of sentence-transformers/all-MiniLM-L6-v2.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Default batch size passed to fastembed.
pub const DEFAULT_BATCH_SIZE: usize = 256;

/// Maximum characters per text before truncation.
pub const DEFAULT_MAX_CHARS: usize = 2000;

/// Configuration for the builtin fastembed provider.
#[derive(Debug, Clone)]
pub struct EmbedderConfig {
    pub model: EmbeddingModel,
    pub batch_size: usize,
    pub max_chars: usize,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            model: EmbeddingModel::AllMiniLML6V2,
            batch_size: DEFAULT_BATCH_SIZE,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

/// Batch text-to-vector capability.
///
/// Implementations must preserve input order and return unit-normalized
/// vectors of a fixed dimension. Runtime failures surface as
/// [`Error::Inference`]; the core never retries.
pub trait EmbeddingProvider: Send + Sync {
    /// Returns the model identifier.
    fn model_id(&self) -> &str;

    /// Returns the output vector dimension.
    fn dimension(&self) -> usize;

    /// Generates one embedding per input text, in input order.
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// FastEmbed provider using sentence-transformers/all-MiniLM-L6-v2.
pub struct FastEmbedder {
    // fastembed's session is not shareable; serialize batch calls.
    embedder: Mutex<TextEmbedding>,
    config: EmbedderConfig,
    model_id: String,
}

impl FastEmbedder {
    /// Initializes the ONNX model. Downloads weights on first use.
    pub fn new(config: EmbedderConfig) -> Result<Self> {
        let model = config.model.clone();
        let model_id = model.to_string();
        let embedder = TextEmbedding::try_new(InitOptions::new(model)).map_err(|err| {
            Error::Internal(format!("failed to initialize fastembed model: {err}"))
        })?;

        Ok(Self {
            embedder: Mutex::new(embedder),
            config,
            model_id,
        })
    }

    /// Initializes with the default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(EmbedderConfig::default())
    }
}

impl EmbeddingProvider for FastEmbedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dimension(&self) -> usize {
        DEFAULT_EMBEDDING_DIM
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let prepared = truncate_texts(texts, self.config.max_chars);
        let mut embedder = self
            .embedder
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut embeddings = embedder
            .embed(&prepared, Some(self.config.batch_size))
            .map_err(|err| Error::Inference(err.to_string()))?;

        // Cosine similarity reduces to a dot product only on unit vectors.
        for embedding in embeddings.iter_mut() {
            l2_normalize(embedding);
        }

        Ok(embeddings)
    }
}

/// Deterministic provider mapping token hashes into a bag-of-words vector.
///
/// Identical texts produce identical unit vectors, so an exact-match query
/// scores 1.0 against its chunk. Used by tests and by CLI runs configured
/// with `provider = "hash"`.
pub struct HashEmbedder {
    model: String,
    dimension: usize,
}

impl HashEmbedder {
    /// Creates a hash provider with the specified dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            model: "hash".to_string(),
            dimension,
        }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(64)
    }
}

impl EmbeddingProvider for HashEmbedder {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let vectors = texts
            .iter()
            .map(|text| {
                let mut vector = vec![0.0f32; self.dimension];
                for token in text.split_whitespace() {
                    let mut hasher = DefaultHasher::new();
                    token.to_lowercase().hash(&mut hasher);
                    let slot = (hasher.finish() as usize) % self.dimension;
                    vector[slot] += 1.0;
                }
                l2_normalize(&mut vector);
                vector
            })
            .collect();

        Ok(vectors)
    }
}

/// Scales a vector to unit Euclidean length. Zero vectors are left as-is.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return;
    }
    for value in vector.iter_mut() {
        *value /= norm;
    }
}

fn truncate_texts<'a>(texts: &'a [String], max_chars: usize) -> Vec<Cow<'a, str>> {
    texts
        .iter()
        .map(|text| truncate_to_chars(text.as_str(), max_chars))
        .collect()
}

fn truncate_to_chars(input: &str, max_chars: usize) -> Cow<'_, str> {
    if max_chars == 0 {
        return Cow::Borrowed("");
    }

    let mut count = 0;
    for (idx, _) in input.char_indices() {
        if count == max_chars {
            return Cow::Owned(input[..idx].to_string());
        }
        count += 1;
    }

    Cow::Borrowed(input)
}
