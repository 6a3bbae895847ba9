// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding module - model lifecycle and batch text-to-vector providers.

pub mod model;
pub mod provider;

pub use model::{ModelHandle, ModelState};
pub use provider::{
    l2_normalize, EmbedderConfig, EmbeddingProvider, FastEmbedder, HashEmbedder,
    DEFAULT_BATCH_SIZE, DEFAULT_EMBEDDING_DIM, DEFAULT_MAX_CHARS,
};
