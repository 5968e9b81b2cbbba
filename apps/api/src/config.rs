use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::i18n::Locale;

/// Which backend family serves generation or embeddings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Ollama,
    Anthropic,
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "ollama" => Ok(ProviderKind::Ollama),
            "anthropic" => Ok(ProviderKind::Anthropic),
            other => bail!("Unknown provider '{other}' (expected openai, ollama or anthropic)"),
        }
    }
}

/// Everything needed to build provider clients for one request.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub llm_provider: ProviderKind,
    pub llm_api_key: Option<String>,
    pub llm_base_url: String,
    pub embedding_provider: ProviderKind,
    pub embedding_api_key: Option<String>,
    pub embedding_base_url: String,
    pub embedding_model: String,
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub providers: ProviderConfig,
    /// Model used when a request does not name one.
    pub default_model: String,
    pub max_improvement_retries: u32,
    /// Models that require a valid premium token.
    pub premium_models: Vec<String>,
    pub default_locale: Locale,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let llm_provider: ProviderKind = env_or("LLM_PROVIDER", "openai").parse()?;
        let embedding_provider: ProviderKind = env_or("EMBEDDING_PROVIDER", "openai").parse()?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            providers: ProviderConfig {
                llm_provider,
                llm_api_key: optional_env("LLM_API_KEY"),
                llm_base_url: env_or("LLM_BASE_URL", default_base_url(llm_provider)),
                embedding_provider,
                embedding_api_key: optional_env("EMBEDDING_API_KEY")
                    .or_else(|| optional_env("LLM_API_KEY")),
                embedding_base_url: env_or(
                    "EMBEDDING_BASE_URL",
                    default_base_url(embedding_provider),
                ),
                embedding_model: env_or("EMBEDDING_MODEL", "text-embedding-3-small"),
            },
            default_model: env_or("LL_MODEL", "gpt-4.1-mini"),
            max_improvement_retries: env_or("MAX_IMPROVEMENT_RETRIES", "5")
                .parse::<u32>()
                .context("MAX_IMPROVEMENT_RETRIES must be a non-negative integer")?,
            premium_models: parse_list(&env_or("PREMIUM_MODELS", "gpt-4o")),
            default_locale: Locale::normalize(optional_env("DEFAULT_LOCALE").as_deref()),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn default_base_url(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::OpenAi => "https://api.openai.com/v1",
        ProviderKind::Ollama => "http://localhost:11434",
        ProviderKind::Anthropic => "https://api.anthropic.com",
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}
