// SPDX-License-Identifier: MIT OR Apache-2.0

//! semdex - In-memory semantic retrieval engine
//!
//! Ingests text files into an in-memory vector store and ranks their
//! overlapping word-windows against a query.

mod cli;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, OutputFormat};
use semdex::chunker::{ChunkConfig, WordChunker};
use semdex::config::{Config, ProviderType};
use semdex::embedding::{
    EmbedderConfig, EmbeddingProvider, FastEmbedder, HashEmbedder, ModelHandle,
};
use semdex::engine::{Engine, IngestRequest};
use semdex::output;

fn main() -> Result<()> {
    // Initialize tracing with SEMDEX_LOG env var (e.g., SEMDEX_LOG=debug semdex query "...")
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("SEMDEX_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let format = cli.format.unwrap_or_default();
    let config = Config::load();

    match cli.command {
        Commands::Query {
            query,
            files,
            top_k,
            no_context,
            chunk_words,
            overlap_words,
        } => {
            let engine = build_engine(&config)?;
            for file in &files {
                let text = read_text(file)?;
                engine.ingest(IngestRequest {
                    id: Some(file.display().to_string()),
                    text,
                    chunk_words: chunk_words.or(Some(config.chunking.chunk_words())),
                    overlap_words: overlap_words.or(Some(config.chunking.overlap_words())),
                })?;
            }

            let include_context = if no_context {
                false
            } else {
                config.search.include_context()
            };
            let response = engine.match_query(
                &query,
                top_k.or(Some(config.search.top_k())),
                Some(include_context),
            )?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
                OutputFormat::Text => {
                    print!("{}", output::render_matches(&response, output::use_colors()))
                }
            }
        }

        Commands::Chunks {
            file,
            chunk_words,
            overlap_words,
        } => {
            let text = read_text(&file)?;
            let chunk_config = ChunkConfig::new(
                chunk_words.unwrap_or(config.chunking.chunk_words()),
                overlap_words.unwrap_or(config.chunking.overlap_words()),
            )?;
            let windows = WordChunker::new(chunk_config).chunk_text(&text)?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&windows)?),
                OutputFormat::Text => {
                    print!("{}", output::render_chunks(&windows, output::use_colors()))
                }
            }
        }

        Commands::Health => {
            let engine = build_engine(&config)?;
            let health = engine.health();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&health)?),
                OutputFormat::Text => println!(
                    "status: {}\nmodel: {}\ndocs: {}, chunks: {}",
                    health.status,
                    health.model.as_deref().unwrap_or("-"),
                    health.store.docs,
                    health.store.chunks,
                ),
            }
        }
    }

    Ok(())
}

fn build_engine(config: &Config) -> Result<Engine> {
    let handle = Arc::new(ModelHandle::unloaded());
    let embeddings = &config.embeddings;

    match embeddings.provider() {
        ProviderType::Builtin => {
            let provider_config = EmbedderConfig {
                batch_size: embeddings.batch_size(),
                max_chars: embeddings.max_chars(),
                ..Default::default()
            };
            handle.load_with(move || {
                FastEmbedder::new(provider_config)
                    .map(|p| Box::new(p) as Box<dyn EmbeddingProvider>)
            })?;
        }
        ProviderType::Hash => {
            let dimension = embeddings.hash_dimension();
            handle.load_with(move || {
                Ok(Box::new(HashEmbedder::new(dimension)) as Box<dyn EmbeddingProvider>)
            })?;
        }
    }

    Ok(Engine::with_chunk_defaults(
        handle,
        ChunkConfig::new(
            config.chunking.chunk_words(),
            config.chunking.overlap_words(),
        )?,
    ))
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))
}
