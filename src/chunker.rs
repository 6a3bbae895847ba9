// SPDX-License-Identifier: MIT OR Apache-2.0

//! Word-window chunker.
//!
//! Splits a document into overlapping windows of whitespace-delimited words.
//! Chunking is a pure function of `(text, chunk_words, overlap_words)`:
//! re-chunking the same inputs always yields identical output.

use serde::Serialize;

use crate::errors::{Error, Result};

/// Default number of words per chunk.
pub const DEFAULT_CHUNK_WORDS: usize = 250;

/// Default overlap between consecutive chunks.
pub const DEFAULT_OVERLAP_WORDS: usize = 50;

/// Configuration for the word-window chunker.
#[derive(Debug, Clone, Copy)]
pub struct ChunkConfig {
    /// Number of words per chunk.
    pub chunk_words: usize,
    /// Number of overlapping words between consecutive chunks.
    pub overlap_words: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_words: DEFAULT_CHUNK_WORDS,
            overlap_words: DEFAULT_OVERLAP_WORDS,
        }
    }
}

impl ChunkConfig {
    /// Creates a validated chunk configuration.
    ///
    /// `overlap_words` must be strictly smaller than `chunk_words`, otherwise
    /// the window stride would be zero or negative and the scan would never
    /// advance.
    pub fn new(chunk_words: usize, overlap_words: usize) -> Result<Self> {
        if chunk_words == 0 {
            return Err(Error::validation("chunk_words must be greater than 0"));
        }
        if overlap_words >= chunk_words {
            return Err(Error::Validation(format!(
                "overlap_words ({}) must be less than chunk_words ({})",
                overlap_words, chunk_words
            )));
        }
        Ok(Self {
            chunk_words,
            overlap_words,
        })
    }

    /// Window stride in words.
    pub fn stride(&self) -> usize {
        self.chunk_words - self.overlap_words
    }
}

/// A single word-window produced by the chunker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkWindow {
    /// Zero-based position of this window within its document.
    pub index: usize,
    /// Space-joined words covered by the window.
    pub text: String,
}

/// Splits text into ordered overlapping word-windows.
#[derive(Debug, Clone, Copy)]
pub struct WordChunker {
    config: ChunkConfig,
}

impl WordChunker {
    /// Creates a chunker with the given configuration.
    pub fn new(config: ChunkConfig) -> Self {
        Self { config }
    }

    /// Creates a chunker with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ChunkConfig::default())
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Splits `text` into overlapping word-windows.
    ///
    /// The window advances by `chunk_words - overlap_words` words each step
    /// until its start reaches the end of the token sequence. The final
    /// window may be shorter than `chunk_words`; it is kept, not dropped.
    ///
    /// Fails with a validation error on empty or whitespace-only text. A
    /// document shorter than `chunk_words` yields exactly one chunk holding
    /// the whole text.
    pub fn chunk_text(&self, text: &str) -> Result<Vec<ChunkWindow>> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Err(Error::validation("empty document"));
        }

        let stride = self.config.stride();
        let mut chunks = Vec::new();
        let mut start = 0usize;

        while start < words.len() {
            let end = (start + self.config.chunk_words).min(words.len());
            chunks.push(ChunkWindow {
                index: chunks.len(),
                text: words[start..end].join(" "),
            });
            start += stride;
        }

        Ok(chunks)
    }
}
