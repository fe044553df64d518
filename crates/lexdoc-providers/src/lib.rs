//! # Lexdoc Providers
//!
//! Client for the external completion service behind the generative
//! answerer. Any OpenAI-compatible chat API works; Groq is the default
//! endpoint. The client performs exactly one unretried call per question;
//! retry policy, if wanted, belongs to the caller.

pub mod completion;

pub use completion::CompletionClient;
