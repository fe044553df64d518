//! Traits at the seams between crates.
//!
//! Both collaborators of the RAG pipeline are abstract here so the pipeline
//! can be exercised with deterministic implementations in tests.

use async_trait::async_trait;

use crate::error::Result;

/// Embedding backend: maps texts to fixed-dimension vectors.
///
/// Implementations must support batch and single-item calls and must return
/// exactly one vector per input text, in input order. Callers normalize the
/// vectors to unit length before similarity scoring, so implementations are
/// not required to.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Output vector dimension.
    fn dimension(&self) -> usize;
}

/// Generative answerer: produces a natural-language answer to a question
/// strictly from the supplied context.
#[async_trait]
pub trait GenerativeAnswerer: Send + Sync {
    async fn answer(&self, question: &str, context: &str) -> Result<String>;
}
