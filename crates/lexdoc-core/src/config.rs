//! Lexdoc configuration system.
//!
//! Loaded from `~/.lexdoc/config.toml` (override with `LEXDOC_CONFIG`).
//! Every field has a default so an empty or missing file yields a working
//! configuration. The completion API key is deliberately NOT stored here by
//! default: it is resolved from the process environment at call time.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{LexdocError, Result};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexdocConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub rag: RagConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
}

impl Default for LexdocConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            rag: RagConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

impl LexdocConfig {
    /// Load config from the default path, falling back to defaults if the
    /// file does not exist.
    pub fn load() -> Result<Self> {
        let path = std::env::var("LEXDOC_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_path());
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LexdocError::Config(format!("failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| LexdocError::Config(format!("failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Default config path (~/.lexdoc/config.toml).
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".lexdoc")
            .join("config.toml")
    }
}

/// External completion service (generative answerer) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path for chat completions (appended to `base_url`).
    #[serde(default = "default_chat_path")]
    pub chat_path: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Hard timeout for a single completion call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Character budget for the context section of the prompt. Roughly
    /// 4 chars per token, kept well under the provider's token cap.
    #[serde(default = "default_max_context_chars")]
    pub max_context_chars: usize,
    /// Explicit API key override. Empty means "read from the environment".
    #[serde(default)]
    pub api_key: String,
    /// Environment variable the API key is read from when `api_key` is empty.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".into()
}
fn default_chat_path() -> String {
    "/chat/completions".into()
}
fn default_model() -> String {
    "llama-3.1-8b-instant".into()
}
fn default_temperature() -> f32 {
    0.2
}
fn default_max_tokens() -> u32 {
    256
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_context_chars() -> usize {
    20_000
}
fn default_api_key_env() -> String {
    "GROQ_API_KEY".into()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chat_path: default_chat_path(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            max_context_chars: default_max_context_chars(),
            api_key: String::new(),
            api_key_env: default_api_key_env(),
        }
    }
}

/// Retrieval pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    /// Sentences per chunk window.
    #[serde(default = "default_max_sentences")]
    pub max_sentences_per_chunk: usize,
    /// Sentences shared between consecutive windows. Must stay below
    /// `max_sentences_per_chunk`.
    #[serde(default = "default_overlap")]
    pub overlap: usize,
    /// Chunks retrieved when the request does not say otherwise.
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,
}

fn default_max_sentences() -> usize {
    5
}
fn default_overlap() -> usize {
    1
}
fn default_top_k() -> usize {
    3
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            max_sentences_per_chunk: default_max_sentences(),
            overlap: default_overlap(),
            default_top_k: default_top_k(),
        }
    }
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    8000
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}
