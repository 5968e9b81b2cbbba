//! Ollama adapter: `/api/generate` (non-streaming) and `/api/embed`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{
    build_http_client, send_with_retry, EmbeddingProvider, GenerationOptions, LlmProvider,
    ProviderError, RetryPolicy,
};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    num_ctx: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

/// `/api/embed` answers with `embeddings`; older servers answer
/// `/api/embeddings`-style with a single `embedding`.
#[derive(Debug, Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
    #[serde(default)]
    embedding: Option<Vec<f32>>,
}

impl EmbedResponse {
    fn into_vector(self) -> Option<Vec<f32>> {
        self.embedding
            .or_else(|| self.embeddings.into_iter().next())
            .filter(|v| !v.is_empty())
    }
}

#[derive(Clone)]
pub struct OllamaProvider {
    client: Client,
    base_url: String,
    embedding_model: String,
    retry: RetryPolicy,
}

impl OllamaProvider {
    pub fn new(base_url: &str, embedding_model: &str) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            embedding_model: embedding_model.to_string(),
            retry: RetryPolicy::default(),
        })
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn generate(
        &self,
        prompt: &str,
        model: &str,
        options: &GenerationOptions,
    ) -> Result<String, ProviderError> {
        let request_body = GenerateRequest {
            model,
            prompt,
            stream: false,
            options: OllamaOptions {
                temperature: options.temperature,
                top_p: options.top_p,
                top_k: options.top_k,
                num_ctx: options.num_ctx,
            },
        };
        let endpoint = format!("{}/api/generate", self.base_url);

        let response = send_with_retry(self.retry, || {
            self.client.post(&endpoint).json(&request_body)
        })
        .await?;

        let parsed: GenerateResponse = response.json().await?;
        let text = parsed.response.trim();
        if text.is_empty() {
            return Err(ProviderError::EmptyContent);
        }
        Ok(text.to_string())
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let request_body = EmbedRequest {
            model: &self.embedding_model,
            input: text,
        };
        let endpoint = format!("{}/api/embed", self.base_url);

        let response = send_with_retry(self.retry, || {
            self.client.post(&endpoint).json(&request_body)
        })
        .await?;

        let parsed: EmbedResponse = response.json().await?;
        parsed.into_vector().ok_or(ProviderError::EmptyContent)
    }
}
