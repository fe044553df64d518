//! End-to-end retrieval-augmented QA pipeline.
//!
//! Chunk the full context, embed chunks and question, retrieve the top-k
//! chunks, assemble them into a focused context, and hand that to the
//! generative answerer. Every run is a stateless unit of work; nothing is
//! shared between requests except the embedding model itself.

use std::sync::Arc;

use lexdoc_core::error::Result;
use lexdoc_core::traits::{Embedder, GenerativeAnswerer};
use lexdoc_core::types::{RagAnswer, ScoredChunk};

use crate::chunker::SentenceChunker;
use crate::index::EmbeddingIndex;

/// Sentinel answer for context that produced no usable chunks. A contract
/// with callers, not an error.
pub const NO_CONTEXT_ANSWER: &str = "No usable text found in the context.";

/// Join retrieved chunk texts into one focused context string.
///
/// Chunks stay in relevance order (not document order); the blank-line
/// separator lets the downstream model tell chunk boundaries apart. No
/// truncation happens here: the answerer owns its own length budget.
pub fn assemble_context(retrieved: &[ScoredChunk]) -> String {
    retrieved
        .iter()
        .map(|s| s.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The full chunk → embed → retrieve → assemble → answer pipeline.
pub struct RagPipeline {
    chunker: SentenceChunker,
    embedder: Arc<dyn Embedder>,
    answerer: Arc<dyn GenerativeAnswerer>,
}

impl RagPipeline {
    pub fn new(
        chunker: SentenceChunker,
        embedder: Arc<dyn Embedder>,
        answerer: Arc<dyn GenerativeAnswerer>,
    ) -> Self {
        Self {
            chunker,
            embedder,
            answerer,
        }
    }

    /// Answer `question` from `full_context`, grounding the generation on
    /// the `top_k` most similar chunks.
    pub async fn answer(
        &self,
        question: &str,
        full_context: &str,
        top_k: usize,
    ) -> Result<RagAnswer> {
        let chunks = self.chunker.chunk(full_context);
        if chunks.is_empty() {
            return Ok(RagAnswer {
                answer: NO_CONTEXT_ANSWER.to_string(),
                retrieved_chunks: Vec::new(),
            });
        }
        tracing::debug!(chunks = chunks.len(), "chunked context");

        let index = EmbeddingIndex::build(self.embedder.as_ref(), chunks).await?;

        let query = self
            .embedder
            .embed(std::slice::from_ref(&question.to_string()))
            .await?
            .into_iter()
            .next()
            .unwrap_or_default();

        let retrieved = index.retrieve(&query, top_k)?;
        tracing::debug!(retrieved = retrieved.len(), "selected top-k chunks");

        let focused_context = assemble_context(&retrieved);
        let answer = self.answerer.answer(question, &focused_context).await?;

        Ok(RagAnswer {
            answer,
            retrieved_chunks: retrieved.into_iter().map(|s| s.chunk.text).collect(),
        })
    }
}
