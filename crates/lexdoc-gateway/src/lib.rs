//! # Lexdoc Gateway
//!
//! HTTP surface for the legal document assistant: retrieval-augmented QA,
//! plain generative QA, and a health probe. Thin plumbing; all semantics
//! live in `lexdoc-rag` and `lexdoc-providers`.

pub mod routes;
pub mod server;

pub use server::{AppState, build_router, start};
