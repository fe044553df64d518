//! # Lexdoc, the Legal Document Assistant API
//!
//! HTTP service applying pretrained NLP models to legal/policy text, built
//! around a retrieval-augmented QA pipeline.
//!
//! Usage:
//!   lexdoc                         # Start the server (default 127.0.0.1:8000)
//!   lexdoc --port 9000             # Custom port
//!   lexdoc --config ./lexdoc.toml  # Explicit config file
//!
//! The generative answerer needs `GROQ_API_KEY` in the environment; it is
//! checked per call, not at startup.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lexdoc_core::LexdocConfig;
use lexdoc_gateway::AppState;

#[derive(Parser)]
#[command(name = "lexdoc", version, about = "Legal document assistant API")]
struct Cli {
    /// Bind host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to config file (default: ~/.lexdoc/config.toml)
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &cli.config {
        Some(path) => LexdocConfig::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => LexdocConfig::load().context("loading config")?,
    };
    if let Some(host) = cli.host {
        config.gateway.host = host;
    }
    if let Some(port) = cli.port {
        config.gateway.port = port;
    }

    tracing::info!(
        model = %config.llm.model,
        top_k = config.rag.default_top_k,
        "starting lexdoc"
    );

    lexdoc_gateway::start(AppState::new(config))
        .await
        .context("gateway server failed")?;
    Ok(())
}
