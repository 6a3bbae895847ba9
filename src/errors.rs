// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error taxonomy for the retrieval engine.
//!
//! Every fallible core operation returns one of these typed variants. The
//! core performs no retries and never formats user-facing prose; callers at
//! the boundary decide how to present each variant (see [`crate::api`]).

use thiserror::Error;

/// Errors surfaced by the retrieval core.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing input: empty text, empty query, non-positive
    /// chunk size, or overlap >= chunk size.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The embedding model has not finished loading (or was never loaded).
    #[error("embedding model is not ready")]
    ModelNotReady,

    /// The requested resource does not exist, e.g. a query against an empty
    /// store.
    #[error("not found: {0}")]
    NotFound(String),

    /// The embedding model failed at runtime.
    #[error("inference failed: {0}")]
    Inference(String),

    /// Any other internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Shorthand for a validation failure.
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }
}

/// Result alias used throughout the core.
pub type Result<T> = std::result::Result<T, Error>;
