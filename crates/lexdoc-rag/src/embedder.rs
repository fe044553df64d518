//! Embedding backends.
//!
//! Production embedding runs on fastembed's ONNX port of
//! `all-MiniLM-L6-v2` (384 dimensions). The model is expensive to load, so
//! it is initialized lazily, exactly once per process, behind a
//! [`tokio::sync::OnceCell`]; concurrent first requests race on the cell,
//! one wins, the rest share the result. A failed load is surfaced as
//! [`LexdocError::ModelUnavailable`] and retried by the next caller rather
//! than poisoning the process. After initialization the model is shared
//! read-only; the inner mutex is only held for the duration of one encode
//! call, which runs on the blocking thread pool.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fastembed::{EmbeddingModel, TextEmbedding, TextInitOptions};
use tokio::sync::OnceCell;

use lexdoc_core::error::{LexdocError, Result};
use lexdoc_core::traits::Embedder;

/// Output dimension of `all-MiniLM-L6-v2`.
pub const EMBEDDING_DIM: usize = 384;

static SHARED_MODEL: OnceCell<Arc<FastembedEmbedder>> = OnceCell::const_new();

/// Get the process-wide embedding model, loading it on first use.
pub async fn shared() -> Result<Arc<FastembedEmbedder>> {
    SHARED_MODEL
        .get_or_try_init(|| async {
            tracing::info!("loading embedding model: all-MiniLM-L6-v2");
            let model = tokio::task::spawn_blocking(FastembedEmbedder::load)
                .await
                .map_err(|e| LexdocError::ModelUnavailable(e.to_string()))??;
            Ok(Arc::new(model))
        })
        .await
        .cloned()
}

/// fastembed-backed [`Embedder`].
pub struct FastembedEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
}

impl FastembedEmbedder {
    /// Load the ONNX model. Blocking; call from a blocking context.
    pub fn load() -> Result<Self> {
        let model = TextEmbedding::try_new(TextInitOptions::new(EmbeddingModel::AllMiniLML6V2))
            .map_err(|e| LexdocError::ModelUnavailable(e.to_string()))?;
        Ok(Self {
            model: Arc::new(Mutex::new(model)),
        })
    }
}

#[async_trait]
impl Embedder for FastembedEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let model = self.model.clone();
        let batch: Vec<String> = texts.to_vec();
        tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|_| LexdocError::ModelUnavailable("embedding model lock poisoned".into()))?;
            model
                .embed(batch, None)
                .map_err(|e| LexdocError::ModelUnavailable(e.to_string()))
        })
        .await
        .map_err(|e| LexdocError::ModelUnavailable(e.to_string()))?
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIM
    }
}

/// Lazy handle to the shared model.
///
/// Implements [`Embedder`] by resolving [`shared`] per call, so holding a
/// `SharedEmbedder` never forces the model to load before it is needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedEmbedder;

#[async_trait]
impl Embedder for SharedEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        shared().await?.embed(texts).await
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIM
    }
}

/// Deterministic hashed bag-of-words embedder.
///
/// No model download, no I/O: each lowercased whitespace token is hashed
/// into a bucket. Used by tests and offline tooling; never wired in as an
/// automatic fallback for the real model.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(8) }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut vec = vec![0.0f32; self.dim];
        for token in text.split_whitespace() {
            let mut hasher = DefaultHasher::new();
            token.to_lowercase().hash(&mut hasher);
            let idx = (hasher.finish() as usize) % self.dim;
            vec[idx] += 1.0;
        }
        normalize(&mut vec);
        vec
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dim
    }
}

/// Scale `vec` to unit length in place. A zero vector is left untouched.
pub fn normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vec.iter_mut() {
            *v /= norm;
        }
    }
}
