//! Lexdoc error taxonomy.
//!
//! Every fallible operation in the workspace returns [`Result`]. The variants
//! map one-to-one onto how the gateway reports failures: bad request input,
//! server misconfiguration, a local model that failed to load or run, and an
//! upstream completion service that answered with a non-success status or an
//! unparsable body.

use thiserror::Error;

/// Workspace-wide result alias.
pub type Result<T> = std::result::Result<T, LexdocError>;

#[derive(Debug, Error)]
pub enum LexdocError {
    /// Missing or unusable configuration (e.g. no API key in the
    /// environment). Detected at call time, never retried.
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed caller-supplied parameters (e.g. `top_k == 0`).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The local embedding backend failed to load or run.
    #[error("embedding model unavailable: {0}")]
    ModelUnavailable(String),

    /// The external completion service returned a non-success status or a
    /// body missing the expected fields. Carries the raw status and body so
    /// callers can tell transient from permanent failures.
    #[error("upstream completion service error {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Transport-level failure before any HTTP status was received
    /// (connect refused, timeout, TLS).
    #[error("http error: {0}")]
    Http(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LexdocError {
    /// Short machine-readable tag used in JSON error bodies and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            LexdocError::Config(_) => "config",
            LexdocError::InvalidArgument(_) => "invalid_argument",
            LexdocError::ModelUnavailable(_) => "model_unavailable",
            LexdocError::Upstream { .. } => "upstream",
            LexdocError::Http(_) => "http",
            LexdocError::Io(_) => "io",
        }
    }
}
