//! Route handlers and wire schemas.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use lexdoc_core::error::LexdocError;
use lexdoc_rag::{RagPipeline, SentenceChunker};

use crate::server::AppState;

// ---- Error mapping ----

/// Gateway-facing wrapper that maps the error taxonomy onto HTTP statuses.
///
/// Client mistakes are 400; everything the server or its collaborators got
/// wrong is 5xx, with upstream failures kept apart from local ones so the
/// caller can tell them apart.
#[derive(Debug)]
pub struct ApiError(pub LexdocError);

impl From<LexdocError> for ApiError {
    fn from(err: LexdocError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            LexdocError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            LexdocError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LexdocError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            LexdocError::Upstream { .. } | LexdocError::Http(_) => StatusCode::BAD_GATEWAY,
            LexdocError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!(kind = self.0.kind(), "request failed: {}", self.0);
        let body = Json(serde_json::json!({
            "error": {
                "kind": self.0.kind(),
                "message": self.0.to_string(),
            }
        }));
        (status, body).into_response()
    }
}

// ---- Health ----

/// Health check endpoint.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "lexdoc-gateway",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ---- Retrieval-augmented QA ----

#[derive(Debug, Deserialize)]
pub struct QaRagRequest {
    pub question: String,
    pub context: String,
    /// Chunks to retrieve; falls back to the configured default (3).
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct QaRagResponse {
    pub answer: String,
    pub retrieved_chunks: Vec<String>,
}

/// Answer a question about a long legal/policy text.
///
/// Chunks the context, retrieves the `top_k` most similar chunks, and asks
/// the completion service to answer from those chunks only. A context that
/// yields no usable chunks returns the sentinel answer with 200, not an
/// error.
pub async fn qa_rag(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<QaRagRequest>,
) -> Result<Json<QaRagResponse>, ApiError> {
    let top_k = payload.top_k.unwrap_or(state.config.rag.default_top_k);

    let rag = &state.config.rag;
    // Window settings come from server config, not the request.
    let chunker = SentenceChunker::new(rag.max_sentences_per_chunk, rag.overlap)
        .map_err(|e| LexdocError::Config(e.to_string()))?;

    let pipeline = RagPipeline::new(chunker, state.embedder.clone(), state.answerer.clone());
    let result = pipeline
        .answer(&payload.question, &payload.context, top_k)
        .await?;

    Ok(Json(QaRagResponse {
        answer: result.answer,
        retrieved_chunks: result.retrieved_chunks,
    }))
}

// ---- Generative QA (no retrieval) ----

#[derive(Debug, Deserialize)]
pub struct QaGenRequest {
    pub question: String,
    pub context: String,
}

#[derive(Debug, Serialize)]
pub struct QaGenResponse {
    pub answer: String,
}

/// Generative QA over the caller-supplied context as-is: no chunking, no
/// retrieval. The answerer still applies its own context-length budget.
pub async fn qa_gen(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<QaGenRequest>,
) -> Result<Json<QaGenResponse>, ApiError> {
    let answer = state
        .answerer
        .answer(&payload.question, &payload.context)
        .await?;
    Ok(Json(QaGenResponse { answer }))
}
