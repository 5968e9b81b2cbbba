//! OpenAI-compatible adapter: `/chat/completions` for generation and
//! `/embeddings` for vectors. Works against any server speaking that API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::prompts::DEFAULT_SYSTEM;
use super::{
    build_http_client, send_with_retry, EmbeddingProvider, GenerationOptions, LlmProvider,
    ProviderError, RetryPolicy,
};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client,
    base_url: String,
    api_key: String,
    embedding_model: String,
    retry: RetryPolicy,
}

impl OpenAiProvider {
    pub fn new(
        api_key: Option<String>,
        base_url: &str,
        embedding_model: &str,
    ) -> Result<Self, ProviderError> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::Configuration("OpenAI API key is missing".into()))?;
        Ok(Self {
            client: build_http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            embedding_model: embedding_model.to_string(),
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
impl LlmProvider for OpenAiProvider {
    async fn generate(
        &self,
        prompt: &str,
        model: &str,
        options: &GenerationOptions,
    ) -> Result<String, ProviderError> {
        let request_body = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: DEFAULT_SYSTEM,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: options.temperature,
            top_p: options.top_p,
        };
        let endpoint = format!("{}/chat/completions", self.base_url);

        let response = send_with_retry(self.retry, || {
            self.client
                .post(&endpoint)
                .bearer_auth(&self.api_key)
                .json(&request_body)
        })
        .await?;

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ProviderError::EmptyContent)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        // Newlines degrade embedding quality on this API.
        let input = text.replace('\n', " ");
        let request_body = EmbeddingRequest {
            model: &self.embedding_model,
            input: [&input],
        };
        let endpoint = format!("{}/embeddings", self.base_url);

        let response = send_with_retry(self.retry, || {
            self.client
                .post(&endpoint)
                .bearer_auth(&self.api_key)
                .json(&request_body)
        })
        .await?;

        let parsed: EmbeddingResponse = response.json().await?;
        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .filter(|e| !e.is_empty())
            .ok_or(ProviderError::EmptyContent)?;
        debug!("OpenAI embedding computed: dim={}", embedding.len());
        Ok(embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> OpenAiProvider {
        OpenAiProvider::new(Some("sk-test".into()), &server.uri(), "text-embedding-3-small")
            .unwrap()
            .with_retry(RetryPolicy {
                max_attempts: 3,
                base_delay: Duration::from_millis(1),
            })
    }

    #[tokio::test]
    async fn test_embed_flattens_newlines_and_returns_vector() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "text-embedding-3-small",
                "input": ["Rust Tokio"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"embedding": [0.1, 0.2, 0.3], "index": 0}]
            })))
            .mount(&server)
            .await;

        let vector = provider(&server).embed("Rust\nTokio").await.unwrap();
        assert_eq!(vector, vec![0.1, 0.2, 0.3]);
    }

    #[tokio::test]
    async fn test_generate_authenticates_with_configured_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "# Resume"}}]
            })))
            .mount(&server)
            .await;

        let text = provider(&server)
            .generate("rewrite", "gpt-4o", &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(text, "# Resume");
    }

    #[tokio::test]
    async fn test_rate_limit_then_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"embedding": [1.0], "index": 0}]
            })))
            .mount(&server)
            .await;

        let vector = provider(&server).embed("x").await.unwrap();
        assert_eq!(vector, vec![1.0]);
    }

    #[tokio::test]
    async fn test_empty_choice_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let err = provider(&server)
            .generate("x", "m", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::EmptyContent));
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let err = OpenAiProvider::new(None, "http://localhost", "m").err().unwrap();
        assert!(matches!(err, ProviderError::Configuration(_)));
    }
}
