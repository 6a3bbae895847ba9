// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding model lifecycle.
//!
//! The process owns exactly one [`ModelHandle`], constructed at startup and
//! injected into the engine. It moves through `Unloaded -> Loading -> Ready`
//! once, or lands in `Failed` when provider initialization errors out.
//! `Failed` is fatal: the handle never retries and every embed call keeps
//! returning the load failure.

use std::sync::{PoisonError, RwLock};

use tracing::{debug, error};

use crate::embedding::provider::EmbeddingProvider;
use crate::errors::{Error, Result};

/// Observable lifecycle states of the embedding model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelState {
    Unloaded,
    Loading,
    Ready,
    Failed,
}

enum Inner {
    Unloaded,
    Loading,
    Ready(Box<dyn EmbeddingProvider>),
    Failed(String),
}

/// Process-wide handle to the embedding capability.
pub struct ModelHandle {
    inner: RwLock<Inner>,
}

impl ModelHandle {
    /// Creates a handle with no model loaded yet.
    pub fn unloaded() -> Self {
        Self {
            inner: RwLock::new(Inner::Unloaded),
        }
    }

    /// Creates a handle that is immediately ready, skipping the load phase.
    pub fn ready(provider: Box<dyn EmbeddingProvider>) -> Self {
        Self {
            inner: RwLock::new(Inner::Ready(provider)),
        }
    }

    /// Runs provider initialization and transitions the handle once.
    ///
    /// The handle reads `Loading` while `init` runs, so concurrent embed
    /// calls fail with [`Error::ModelNotReady`] instead of blocking behind
    /// model startup. Calling `load_with` on anything but an `Unloaded`
    /// handle is a programming error.
    pub fn load_with<F>(&self, init: F) -> Result<()>
    where
        F: FnOnce() -> Result<Box<dyn EmbeddingProvider>>,
    {
        {
            let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            match *inner {
                Inner::Unloaded => *inner = Inner::Loading,
                _ => {
                    return Err(Error::Internal(
                        "embedding model was already loaded".to_string(),
                    ))
                }
            }
        }

        match init() {
            Ok(provider) => {
                debug!(model = provider.model_id(), "embedding model ready");
                let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
                *inner = Inner::Ready(provider);
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "embedding model failed to load");
                let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
                *inner = Inner::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ModelState {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        match *inner {
            Inner::Unloaded => ModelState::Unloaded,
            Inner::Loading => ModelState::Loading,
            Inner::Ready(_) => ModelState::Ready,
            Inner::Failed(_) => ModelState::Failed,
        }
    }

    /// True once the provider finished loading.
    pub fn is_ready(&self) -> bool {
        self.state() == ModelState::Ready
    }

    /// Model identifier, when ready.
    pub fn model_id(&self) -> Option<String> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        match &*inner {
            Inner::Ready(provider) => Some(provider.model_id().to_string()),
            _ => None,
        }
    }

    /// Output vector dimension, when ready.
    pub fn dimension(&self) -> Option<usize> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        match &*inner {
            Inner::Ready(provider) => Some(provider.dimension()),
            _ => None,
        }
    }

    /// Embeds a batch of texts through the loaded provider.
    ///
    /// Fails with [`Error::ModelNotReady`] before the model is ready, or
    /// with the recorded load failure once the handle is `Failed`.
    pub fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        match &*inner {
            Inner::Ready(provider) => provider.embed(texts),
            Inner::Failed(reason) => Err(Error::Inference(format!(
                "embedding model failed to load: {reason}"
            ))),
            Inner::Unloaded | Inner::Loading => Err(Error::ModelNotReady),
        }
    }
}
