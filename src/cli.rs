// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI argument parsing using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// semdex - In-memory semantic retrieval engine
///
/// Ingests text files as overlapping word-windows, embeds them, and ranks
/// the windows against a free-text query.
#[derive(Parser, Debug)]
#[command(name = "semdex")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest files and rank their chunks against a query
    #[command(alias = "q")]
    Query {
        /// Query text (natural language)
        query: String,

        /// Text files to ingest before matching
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Maximum number of results to return
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Do not attach neighboring chunk context to hits
        #[arg(long)]
        no_context: bool,

        /// Words per chunk
        #[arg(long)]
        chunk_words: Option<usize>,

        /// Overlapping words between consecutive chunks
        #[arg(long)]
        overlap_words: Option<usize>,
    },

    /// Show the chunk windows a file would produce, without embedding
    Chunks {
        /// Text file to chunk
        file: PathBuf,

        /// Words per chunk
        #[arg(long)]
        chunk_words: Option<usize>,

        /// Overlapping words between consecutive chunks
        #[arg(long)]
        overlap_words: Option<usize>,
    },

    /// Load the configured provider and report engine health
    Health,
}
