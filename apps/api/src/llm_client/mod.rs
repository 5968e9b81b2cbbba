/// LLM client: the single point of entry for every generation and embedding call.
///
/// ARCHITECTURAL RULE: No other module may call a model backend directly.
/// Services depend on the `LlmProvider` / `EmbeddingProvider` traits only;
/// the concrete adapters live in the submodules and are built at startup
/// from `ProviderConfig` (see `Providers::from_config`).
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::config::{ProviderConfig, ProviderKind};

pub mod anthropic;
pub mod ollama;
pub mod openai;
pub mod prompts;

use self::anthropic::AnthropicProvider;
use self::ollama::OllamaProvider;
use self::openai::OpenAiProvider;
use self::prompts::JSON_ONLY_INSTRUCTION;

const MAX_RETRIES: u32 = 3;
const HTTP_TIMEOUT_SECS: u64 = 120;

/// Uniform failure type for every backend. Callers treat all variants as
/// "generation failed" / "embedding failed".
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Provider returned empty content")]
    EmptyContent,

    #[error("{provider} does not support {operation}")]
    Unsupported {
        provider: &'static str,
        operation: &'static str,
    },

    #[error("Provider misconfigured: {0}")]
    Configuration(String),
}

/// Sampling options forwarded to the backend. Defaults mirror what the
/// scoring pipeline has always used: deterministic output, wide context.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub num_ctx: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            top_p: 0.9,
            top_k: 40,
            num_ctx: 20_000,
        }
    }
}

/// Text generation capability.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Returns the model's text answer for `prompt`.
    async fn generate(
        &self,
        prompt: &str,
        model: &str,
        options: &GenerationOptions,
    ) -> Result<String, ProviderError>;

    /// Asks for JSON matching `schema` and parses the answer.
    /// The value is NOT validated against the schema here; the extraction
    /// layer does that.
    async fn generate_structured(
        &self,
        prompt: &str,
        model: &str,
        schema: &Value,
    ) -> Result<Value, ProviderError> {
        let schema_text = serde_json::to_string_pretty(schema)?;
        let prompt = format!(
            "{prompt}\n\n{JSON_ONLY_INSTRUCTION}\nJSON schema:\n{schema_text}"
        );
        let text = self
            .generate(&prompt, model, &GenerationOptions::default())
            .await?;
        let text = strip_json_fences(&text);
        if text.is_empty() {
            return Err(ProviderError::EmptyContent);
        }
        Ok(serde_json::from_str(text)?)
    }
}

/// Embedding capability: text in, fixed-length vector out.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;
}

/// Generation and embedding clients, pooled in `AppState`.
#[derive(Clone)]
pub struct Providers {
    pub llm: Arc<dyn LlmProvider>,
    pub embedder: Arc<dyn EmbeddingProvider>,
}

impl Providers {
    /// Builds both clients from configuration once at startup. Backend
    /// credentials come only from `ProviderConfig`.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let llm: Arc<dyn LlmProvider> = match config.llm_provider {
            ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(
                config.llm_api_key.clone(),
                &config.llm_base_url,
                &config.embedding_model,
            )?),
            ProviderKind::Ollama => Arc::new(OllamaProvider::new(
                &config.llm_base_url,
                &config.embedding_model,
            )?),
            ProviderKind::Anthropic => {
                let key = config.llm_api_key.clone().ok_or_else(|| {
                    ProviderError::Configuration("LLM_API_KEY is required for anthropic".into())
                })?;
                Arc::new(AnthropicProvider::new(key, &config.llm_base_url)?)
            }
        };

        let embedder: Arc<dyn EmbeddingProvider> = match config.embedding_provider {
            ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(
                config.embedding_api_key.clone(),
                &config.embedding_base_url,
                &config.embedding_model,
            )?),
            ProviderKind::Ollama => Arc::new(OllamaProvider::new(
                &config.embedding_base_url,
                &config.embedding_model,
            )?),
            ProviderKind::Anthropic => {
                return Err(ProviderError::Unsupported {
                    provider: "anthropic",
                    operation: "embeddings",
                })
            }
        };

        Ok(Self { llm, embedder })
    }
}

/// Backoff schedule shared by the HTTP adapters.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRIES,
            base_delay: Duration::from_millis(1000),
        }
    }
}

pub(crate) fn build_http_client() -> Result<reqwest::Client, ProviderError> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()?)
}

/// Sends the request produced by `make_request`, retrying on transport
/// errors, 429 and 5xx with exponential backoff (base, 2×base, 4×base…).
/// Any other non-success status fails immediately with the body text,
/// preferring the `error.message` field when the body is JSON.
pub(crate) async fn send_with_retry<F>(
    policy: RetryPolicy,
    make_request: F,
) -> Result<Response, ProviderError>
where
    F: Fn() -> RequestBuilder,
{
    let mut last_error: Option<ProviderError> = None;

    for attempt in 0..policy.max_attempts {
        if attempt > 0 {
            let delay = policy.base_delay * (1 << (attempt - 1));
            warn!(
                "Provider call attempt {} failed, retrying after {}ms...",
                attempt,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }

        let response = match make_request().send().await {
            Ok(r) => r,
            Err(e) => {
                last_error = Some(ProviderError::Http(e));
                continue;
            }
        };

        let status = response.status();

        if status.as_u16() == 429 || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            warn!("Provider API returned {}: {}", status, body);
            last_error = Some(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            });
            continue;
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        return Ok(response);
    }

    Err(last_error.unwrap_or(ProviderError::RateLimited {
        retries: policy.max_attempts,
    }))
}

/// Pulls `error.message` (or `error` as a string) out of a JSON error body.
fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(|e| {
            e.get("message")
                .and_then(Value::as_str)
                .or_else(|| e.as_str())
        })
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    strip_fences(text, &["```json", "```JSON"])
}

/// Strips ```markdown / ```md fences the model sometimes wraps rewrites in.
pub fn strip_markdown_fences(text: &str) -> &str {
    strip_fences(text, &["```markdown", "```md"])
}

fn strip_fences<'a>(text: &'a str, tags: &[&str]) -> &'a str {
    let text = text.trim();
    let opened = tags
        .iter()
        .find_map(|tag| text.strip_prefix(tag))
        .or_else(|| text.strip_prefix("```"));

    match opened {
        Some(stripped) => stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start()),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_markdown_fences() {
        let input = "```markdown\n# Jane Doe\n- Rust\n```";
        assert_eq!(strip_markdown_fences(input), "# Jane Doe\n- Rust");
        assert_eq!(strip_markdown_fences("  # Plain  "), "# Plain");
    }

    #[test]
    fn test_error_message_prefers_json_message() {
        let body = r#"{"error": {"message": "invalid api key", "type": "auth"}}"#;
        assert_eq!(error_message(body), "invalid api key");
        assert_eq!(error_message(r#"{"error": "model not found"}"#), "model not found");
        assert_eq!(error_message("plain failure"), "plain failure");
    }

    #[test]
    fn test_default_generation_options() {
        let opts = GenerationOptions::default();
        assert_eq!(opts.temperature, 0.0);
        assert_eq!(opts.top_k, 40);
        assert_eq!(opts.num_ctx, 20_000);
    }

    /// Records the prompt and answers with a canned reply.
    struct CannedLlm {
        reply: String,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LlmProvider for CannedLlm {
        async fn generate(
            &self,
            prompt: &str,
            _model: &str,
            _options: &GenerationOptions,
        ) -> Result<String, ProviderError> {
            self.seen.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    #[tokio::test]
    async fn test_generate_structured_parses_fenced_json_and_embeds_schema() {
        let llm = CannedLlm {
            reply: "```json\n{\"details\": \"ok\"}\n```".to_string(),
            seen: Mutex::new(vec![]),
        };
        let schema = serde_json::json!({"type": "object", "title": "Analysis"});

        let value = llm
            .generate_structured("Summarise.", "m", &schema)
            .await
            .unwrap();

        assert_eq!(value["details"], "ok");
        let prompt = llm.seen.lock().unwrap()[0].clone();
        assert!(prompt.starts_with("Summarise."));
        assert!(prompt.contains("\"title\": \"Analysis\""));
    }

    #[tokio::test]
    async fn test_generate_structured_rejects_prose() {
        let llm = CannedLlm {
            reply: "Sorry, I cannot help with that.".to_string(),
            seen: Mutex::new(vec![]),
        };
        let err = llm
            .generate_structured("x", "m", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
    }

    #[test]
    fn test_anthropic_cannot_embed() {
        let config = ProviderConfig {
            llm_provider: ProviderKind::OpenAi,
            llm_api_key: Some("sk-test".into()),
            llm_base_url: "http://localhost:1".into(),
            embedding_provider: ProviderKind::Anthropic,
            embedding_api_key: None,
            embedding_base_url: "http://localhost:1".into(),
            embedding_model: "text-embedding-3-small".into(),
        };
        let err = Providers::from_config(&config).err().unwrap();
        assert!(matches!(err, ProviderError::Unsupported { .. }));
    }
}
