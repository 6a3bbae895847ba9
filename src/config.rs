// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration file support for semdex
//!
//! Loads configuration from .semdexrc.toml in the current directory or
//! ~/.config/semdex/config.toml

use serde::Deserialize;
use std::path::PathBuf;

use crate::chunker::{DEFAULT_CHUNK_WORDS, DEFAULT_OVERLAP_WORDS};
use crate::retriever::DEFAULT_TOP_K;

/// Embedding provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// fastembed all-MiniLM-L6-v2
    #[default]
    Builtin,
    /// Deterministic token-hash vectors (offline, no model download)
    Hash,
}

/// Embedding configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmbeddingSection {
    /// Provider type (builtin, hash)
    pub provider: Option<ProviderType>,
    /// Vector dimension for the hash provider
    pub hash_dimension: Option<usize>,
    /// Batch size for the builtin provider
    pub batch_size: Option<usize>,
    /// Maximum characters per text before truncation
    pub max_chars: Option<usize>,
}

impl EmbeddingSection {
    /// Get provider type (defaults to Builtin)
    pub fn provider(&self) -> ProviderType {
        self.provider.unwrap_or_default()
    }

    /// Get hash provider dimension (defaults to 64)
    pub fn hash_dimension(&self) -> usize {
        self.hash_dimension.unwrap_or(64)
    }

    /// Get batch size (defaults to 256)
    pub fn batch_size(&self) -> usize {
        self.batch_size.unwrap_or(crate::embedding::DEFAULT_BATCH_SIZE)
    }

    /// Get max chars (defaults to 2000)
    pub fn max_chars(&self) -> usize {
        self.max_chars.unwrap_or(crate::embedding::DEFAULT_MAX_CHARS)
    }
}

/// Chunking configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChunkingSection {
    /// Words per chunk
    pub chunk_words: Option<usize>,
    /// Overlapping words between consecutive chunks
    pub overlap_words: Option<usize>,
}

impl ChunkingSection {
    /// Get chunk words (defaults to 250)
    pub fn chunk_words(&self) -> usize {
        self.chunk_words.unwrap_or(DEFAULT_CHUNK_WORDS)
    }

    /// Get overlap words (defaults to 50)
    pub fn overlap_words(&self) -> usize {
        self.overlap_words.unwrap_or(DEFAULT_OVERLAP_WORDS)
    }
}

/// Search configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    /// Default number of results
    pub top_k: Option<usize>,
    /// Whether hits carry neighbor context by default
    pub include_context: Option<bool>,
}

impl SearchSection {
    /// Get top k (defaults to 3)
    pub fn top_k(&self) -> usize {
        self.top_k.unwrap_or(DEFAULT_TOP_K)
    }

    /// Get include context (defaults to true)
    pub fn include_context(&self) -> bool {
        self.include_context.unwrap_or(true)
    }
}

/// Configuration loaded from .semdexrc.toml or ~/.config/semdex/config.toml
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Embedding configuration
    #[serde(default)]
    pub embeddings: EmbeddingSection,

    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingSection,

    /// Search configuration
    #[serde(default)]
    pub search: SearchSection,
}

impl Config {
    /// Load configuration from files
    ///
    /// Precedence (highest to lowest):
    /// 1. .semdexrc.toml in current directory
    /// 2. ~/.config/semdex/config.toml
    pub fn load() -> Self {
        if let Some(config) = Self::load_from_path(&PathBuf::from(".semdexrc.toml")) {
            return config;
        }

        if let Some(home) = dirs::home_dir() {
            let config_path = home.join(".config").join("semdex").join("config.toml");
            if let Some(config) = Self::load_from_path(&config_path) {
                return config;
            }
        }

        Self::default()
    }

    fn load_from_path(path: &PathBuf) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.embeddings.provider(), ProviderType::Builtin);
        assert_eq!(config.chunking.chunk_words(), 250);
        assert_eq!(config.chunking.overlap_words(), 50);
        assert_eq!(config.search.top_k(), 3);
        assert!(config.search.include_context());
    }

    #[test]
    fn test_parse_sections() {
        let config: Config = toml::from_str(
            r#"
[embeddings]
provider = "hash"
hash_dimension = 128

[chunking]
chunk_words = 100
overlap_words = 25

[search]
top_k = 5
include_context = false
"#,
        )
        .unwrap();

        assert_eq!(config.embeddings.provider(), ProviderType::Hash);
        assert_eq!(config.embeddings.hash_dimension(), 128);
        assert_eq!(config.chunking.chunk_words(), 100);
        assert_eq!(config.chunking.overlap_words(), 25);
        assert_eq!(config.search.top_k(), 5);
        assert!(!config.search.include_context());
    }

    #[test]
    fn test_partial_config_falls_back() {
        let config: Config = toml::from_str(
            r#"
[search]
top_k = 10
"#,
        )
        .unwrap();

        assert_eq!(config.search.top_k(), 10);
        assert_eq!(config.chunking.chunk_words(), 250);
        assert_eq!(config.embeddings.provider(), ProviderType::Builtin);
    }
}
