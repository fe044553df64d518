//! OpenAI-compatible completion client.
//!
//! Sends a single-user-message chat completion request and extracts the
//! first choice's content. The API key is resolved at call time (config
//! override first, then the configured environment variable) and its
//! absence fails before any network traffic.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;

use lexdoc_core::config::LlmConfig;
use lexdoc_core::error::{LexdocError, Result};
use lexdoc_core::traits::GenerativeAnswerer;

/// Fallback phrase the model is instructed to emit when the context does
/// not contain the answer. Downstream hallucination checks key off it.
pub const NOT_IN_CONTEXT_PHRASE: &str =
    "The answer is not clearly specified in the provided text.";

/// Client for an OpenAI-compatible chat completions endpoint.
pub struct CompletionClient {
    base_url: String,
    chat_path: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
    max_context_chars: usize,
    api_key: String,
    api_key_env: String,
    client: reqwest::Client,
}

impl CompletionClient {
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            chat_path: config.chat_path.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.timeout_secs),
            max_context_chars: config.max_context_chars,
            api_key: config.api_key.clone(),
            api_key_env: config.api_key_env.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Resolve the API key: explicit config value, else environment.
    fn resolve_api_key(&self) -> Result<String> {
        if !self.api_key.is_empty() {
            return Ok(self.api_key.clone());
        }
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.is_empty() => Ok(key),
            _ => Err(LexdocError::Config(format!(
                "{} is not set in the environment",
                self.api_key_env
            ))),
        }
    }
}

/// Build the legal-assistant prompt around the question and context.
fn build_prompt(question: &str, context: &str) -> String {
    format!(
        "You are a precise legal assistant.\n\n\
         Use ONLY the information in the CONTEXT below to answer the QUESTION.\n\
         If the answer is not clearly stated in the context, say: \"{NOT_IN_CONTEXT_PHRASE}\"\n\n\
         CONTEXT:\n{context}\n\n\
         QUESTION:\n{question}\n\n\
         Answer in 2-4 sentences in clear, formal English.\n"
    )
}

/// Cut `context` to at most `budget` characters.
///
/// Keeps the prompt under the provider's token cap (~4 chars per token).
/// Lossy: anything past the budget, i.e. the lowest-ranked retrieved
/// content, is silently dropped.
fn truncate_context(context: &str, budget: usize) -> &str {
    match context.char_indices().nth(budget) {
        Some((byte_idx, _)) => &context[..byte_idx],
        None => context,
    }
}

#[async_trait]
impl GenerativeAnswerer for CompletionClient {
    async fn answer(&self, question: &str, context: &str) -> Result<String> {
        // Credential check comes first: no network call without a key.
        let api_key = self.resolve_api_key()?;

        let context = truncate_context(context, self.max_context_chars);
        let prompt = build_prompt(question, context);

        let body = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": prompt,
                }
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let url = format!("{}{}", self.base_url, self.chat_path);
        tracing::debug!(model = %self.model, context_chars = context.len(), "sending completion request");
        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| LexdocError::Http(format!("completion request failed ({url}): {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(LexdocError::Upstream { status, body });
        }

        let data: Value = resp
            .json()
            .await
            .map_err(|e| LexdocError::Http(format!("failed to read completion body: {e}")))?;

        let answer = data["choices"]
            .get(0)
            .and_then(|choice| choice["message"]["content"].as_str())
            .ok_or_else(|| LexdocError::Upstream {
                status: 200,
                body: data.to_string(),
            })?;

        Ok(answer.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer, max_context_chars: usize) -> CompletionClient {
        CompletionClient::from_config(&LlmConfig {
            base_url: server.base_url(),
            api_key: "test-key".into(),
            max_context_chars,
            ..LlmConfig::default()
        })
    }

    fn success_body(content: &str) -> serde_json::Value {
        json!({
            "choices": [
                {"message": {"role": "assistant", "content": content}}
            ]
        })
    }

    #[test]
    fn prompt_contains_question_context_and_fallback_instruction() {
        let prompt = build_prompt("Who pays rent?", "The tenant pays rent monthly.");
        assert!(prompt.contains("Who pays rent?"));
        assert!(prompt.contains("The tenant pays rent monthly."));
        assert!(prompt.contains(NOT_IN_CONTEXT_PHRASE));
    }

    #[test]
    fn truncate_cuts_to_exact_budget() {
        let context = "a".repeat(50);
        assert_eq!(truncate_context(&context, 10).chars().count(), 10);
        assert_eq!(truncate_context(&context, 50).len(), 50);
        assert_eq!(truncate_context(&context, 100).len(), 50);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let context = "é".repeat(20);
        let cut = truncate_context(&context, 5);
        assert_eq!(cut.chars().count(), 5);
        assert_eq!(cut, "ééééé");
    }

    #[tokio::test]
    async fn extracts_first_choice_content() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).json_body(success_body("  The tenant pays.  "));
        });

        let answer = client_for(&server, 20_000)
            .answer("Who pays rent?", "The tenant pays rent monthly.")
            .await
            .unwrap();

        mock.assert();
        assert_eq!(answer, "The tenant pays.");
    }

    #[tokio::test]
    async fn request_carries_model_and_prompt() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .header("authorization", "Bearer test-key")
                .body_includes("llama-3.1-8b-instant")
                .body_includes("Who pays rent?");
            then.status(200).json_body(success_body("ok"));
        });

        client_for(&server, 20_000)
            .answer("Who pays rent?", "The tenant pays rent monthly.")
            .await
            .unwrap();

        mock.assert();
    }

    #[tokio::test]
    async fn long_context_is_truncated_before_sending() {
        let server = MockServer::start();
        // The overflow marker sits past the budget, so it must never reach
        // the wire.
        let kept = "K".repeat(64);
        let context = format!("{kept}ZOVERFLOWZ");

        let overflow_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .body_includes("ZOVERFLOWZ");
            then.status(200).json_body(success_body("leaked"));
        });
        let truncated_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .body_includes(&kept);
            then.status(200).json_body(success_body("ok"));
        });

        let answer = client_for(&server, 64)
            .answer("Who pays rent?", &context)
            .await
            .unwrap();

        assert_eq!(answer, "ok");
        overflow_mock.assert_hits(0);
        truncated_mock.assert_hits(1);
    }

    #[tokio::test]
    async fn upstream_error_carries_status_and_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(500).body("rate limited downstream");
        });

        let err = client_for(&server, 20_000)
            .answer("Who pays rent?", "ctx")
            .await
            .unwrap_err();

        match err {
            LexdocError::Upstream { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("rate limited downstream"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_success_body_is_an_upstream_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).json_body(json!({"unexpected": true}));
        });

        let err = client_for(&server, 20_000)
            .answer("Who pays rent?", "ctx")
            .await
            .unwrap_err();

        match err {
            LexdocError::Upstream { status, body } => {
                assert_eq!(status, 200);
                assert!(body.contains("unexpected"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_credential_fails_before_any_request() {
        let server = MockServer::start();
        let any_request = server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).json_body(success_body("ok"));
        });

        let client = CompletionClient::from_config(&LlmConfig {
            base_url: server.base_url(),
            api_key: String::new(),
            api_key_env: "LEXDOC_TEST_KEY_THAT_IS_NEVER_SET".into(),
            ..LlmConfig::default()
        });

        let err = client.answer("Who pays rent?", "ctx").await.unwrap_err();
        assert!(matches!(err, LexdocError::Config(_)));
        any_request.assert_hits(0);
    }
}
