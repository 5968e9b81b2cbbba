//! Anthropic Messages API adapter. Text generation only; Anthropic has no
//! embeddings endpoint, so it can never be the configured embedder.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::prompts::DEFAULT_SYSTEM;
use super::{
    build_http_client, send_with_retry, GenerationOptions, LlmProvider, ProviderError,
    RetryPolicy,
};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    temperature: f32,
    top_p: f32,
    top_k: u32,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl AnthropicResponse {
    /// Extracts the text content from the first text block.
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Clone)]
pub struct AnthropicProvider {
    client: Client,
    endpoint: String,
    api_key: String,
    retry: RetryPolicy,
}

impl AnthropicProvider {
    pub fn new(api_key: String, base_url: &str) -> Result<Self, ProviderError> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::Configuration(
                "missing Anthropic API key".to_string(),
            ));
        }
        Ok(Self {
            client: build_http_client()?,
            endpoint: format!("{}/v1/messages", base_url.trim_end_matches('/')),
            api_key,
            retry: RetryPolicy::default(),
        })
    }

    #[cfg(test)]
    fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn generate(
        &self,
        prompt: &str,
        model: &str,
        options: &GenerationOptions,
    ) -> Result<String, ProviderError> {
        let request_body = AnthropicRequest {
            model,
            max_tokens: MAX_TOKENS,
            system: DEFAULT_SYSTEM,
            temperature: options.temperature,
            top_p: options.top_p,
            top_k: options.top_k,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = send_with_retry(self.retry, || {
            self.client
                .post(&self.endpoint)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
        })
        .await?;

        let parsed: AnthropicResponse = response.json().await?;
        debug!(
            "Anthropic call succeeded: input_tokens={}, output_tokens={}",
            parsed.usage.input_tokens, parsed.usage.output_tokens
        );

        parsed
            .text()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ProviderError::EmptyContent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_generate_returns_first_text_block() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "sk-ant"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [{"type": "text", "text": "  Improved resume  "}],
                "usage": {"input_tokens": 10, "output_tokens": 4}
            })))
            .mount(&server)
            .await;

        let provider = AnthropicProvider::new("sk-ant".into(), &server.uri()).unwrap();
        let text = provider
            .generate("rewrite", "claude-sonnet-4-5", &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(text, "Improved resume");
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"type": "authentication_error", "message": "invalid x-api-key"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = AnthropicProvider::new("bad".into(), &server.uri())
            .unwrap()
            .with_retry(fast_retry());
        let err = provider
            .generate("x", "m", &GenerationOptions::default())
            .await
            .unwrap_err();
        match err {
            ProviderError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid x-api-key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_server_errors_exhaust_retries() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
            .expect(3)
            .mount(&server)
            .await;

        let provider = AnthropicProvider::new("sk".into(), &server.uri())
            .unwrap()
            .with_retry(fast_retry());
        let err = provider
            .generate("x", "m", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Api { status: 529, .. }));
    }

    #[test]
    fn test_blank_key_is_rejected() {
        assert!(AnthropicProvider::new("  ".into(), "http://localhost").is_err());
    }
}
