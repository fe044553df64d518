//! In-memory embedding index and top-k retrieval.
//!
//! The index is a parallel pairing of chunks and unit-normalized vectors,
//! built fresh for every request. Retrieval is a linear dot-product scan,
//! which is correct and fast at the tens-to-hundreds of chunks a single
//! document produces. Growing past that (persisted multi-document corpora)
//! would call for an ANN structure instead.

use std::cmp::Ordering;

use lexdoc_core::error::{LexdocError, Result};
use lexdoc_core::traits::Embedder;
use lexdoc_core::types::{Chunk, ScoredChunk};

use crate::embedder::normalize;

/// Chunks paired with their embedding vectors, row i ↔ chunk i.
pub struct EmbeddingIndex {
    chunks: Vec<Chunk>,
    vectors: Vec<Vec<f32>>,
}

impl EmbeddingIndex {
    /// Embed `chunks` and build the index. Row order matches chunk order;
    /// every row is normalized to unit length so dot product equals cosine
    /// similarity.
    pub async fn build(embedder: &dyn Embedder, chunks: Vec<Chunk>) -> Result<Self> {
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let mut vectors = embedder.embed(&texts).await?;
        if vectors.len() != chunks.len() {
            return Err(LexdocError::ModelUnavailable(format!(
                "embedding backend returned {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }
        for v in &mut vectors {
            normalize(v);
        }
        Ok(Self { chunks, vectors })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Score every chunk against `query` and return the `top_k` best,
    /// descending by score.
    ///
    /// The sort is stable, so equal scores keep their original document
    /// order. `top_k >= len` returns everything ranked; `top_k == 0` is
    /// rejected.
    pub fn retrieve(&self, query: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>> {
        if top_k == 0 {
            return Err(LexdocError::InvalidArgument(
                "top_k must be at least 1".into(),
            ));
        }
        if let Some(row) = self.vectors.first() {
            if query.len() != row.len() {
                return Err(LexdocError::InvalidArgument(format!(
                    "query vector has dimension {}, index has {}",
                    query.len(),
                    row.len()
                )));
            }
        }

        let mut query = query.to_vec();
        normalize(&mut query);

        let mut scored: Vec<ScoredChunk> = self
            .chunks
            .iter()
            .zip(&self.vectors)
            .map(|(chunk, vector)| ScoredChunk {
                chunk: chunk.clone(),
                score: dot(&query, vector),
            })
            .collect();

        // Stable sort: ties keep original chunk order.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(top_k.min(self.chunks.len()));
        Ok(scored)
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
