// SPDX-License-Identifier: MIT OR Apache-2.0

//! semdex - In-memory semantic retrieval library
//!
//! Splits documents into overlapping word-windows, embeds each window into a
//! unit vector, and answers similarity queries with top-k cosine-ranked
//! windows stitched with their neighboring context.

pub mod api;
pub mod chunker;
pub mod config;
pub mod embedding;
pub mod engine;
pub mod errors;
pub mod output;
pub mod retriever;
pub mod store;

pub use engine::{Engine, IngestRequest};
pub use errors::{Error, Result};
