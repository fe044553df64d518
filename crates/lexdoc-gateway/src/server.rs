//! HTTP server implementation using Axum.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use lexdoc_core::config::LexdocConfig;
use lexdoc_core::traits::{Embedder, GenerativeAnswerer};
use lexdoc_providers::CompletionClient;
use lexdoc_rag::SharedEmbedder;

/// Shared state for the gateway server.
///
/// Both collaborators are trait objects so tests can swap in deterministic
/// implementations. Requests themselves are stateless; one slow upstream
/// call only ever stalls its own connection task.
#[derive(Clone)]
pub struct AppState {
    pub config: LexdocConfig,
    pub embedder: Arc<dyn Embedder>,
    pub answerer: Arc<dyn GenerativeAnswerer>,
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Production state: lazy shared embedding model + completion client
    /// from config.
    pub fn new(config: LexdocConfig) -> Self {
        let answerer = CompletionClient::from_config(&config.llm);
        Self {
            config,
            embedder: Arc::new(SharedEmbedder),
            answerer: Arc::new(answerer),
            start_time: std::time::Instant::now(),
        }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers(Any);

    // Restrict CORS origins in production via env var
    // Example: LEXDOC_CORS_ORIGINS=https://app.example.com,https://other.example.com
    let cors = if let Ok(origins_str) = std::env::var("LEXDOC_CORS_ORIGINS") {
        let origins: Vec<_> = origins_str
            .split(',')
            .filter_map(|s| s.trim().parse::<axum::http::HeaderValue>().ok())
            .collect();
        cors.allow_origin(origins)
    } else {
        cors.allow_origin(Any)
    };

    Router::new()
        .route("/health", get(super::routes::health_check))
        .route("/qa_rag", post(super::routes::qa_rag))
        .route("/qa_gen", post(super::routes::qa_gen))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the HTTP server.
pub async fn start(state: AppState) -> std::io::Result<()> {
    let addr = format!(
        "{}:{}",
        state.config.gateway.host, state.config.gateway.port
    );
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🌐 Gateway server listening on http://{}", addr);

    axum::serve(listener, app).await
}
