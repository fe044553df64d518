//! # Lexdoc RAG
//!
//! Retrieval-augmented QA pipeline for long legal/policy documents.
//!
//! ## How it works
//! ```text
//! Full context text
//!   ↓ SentenceChunker — overlapping sentence windows
//! Chunks
//!   ↓ EmbeddingIndex::build — unit-normalized vectors, one row per chunk
//! In-memory index
//!   ↓ retrieve — dot-product scan, stable top-k
//! Top-k chunks
//!   ↓ assemble_context — joined with blank lines
//! Focused context
//!   ↓ GenerativeAnswerer — external completion service
//! Answer + retrieved chunks
//! ```
//!
//! The index lives for a single request. The only process-wide state is the
//! embedding model itself (see [`embedder::shared`]).

pub mod chunker;
pub mod embedder;
pub mod index;
pub mod pipeline;

pub use chunker::SentenceChunker;
pub use embedder::SharedEmbedder;
pub use index::EmbeddingIndex;
pub use pipeline::{NO_CONTEXT_ANSWER, RagPipeline};
