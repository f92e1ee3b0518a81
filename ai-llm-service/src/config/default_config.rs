//! Default LLM configs loaded from environment variables.
//!
//! Two roles are resolved for the selected provider:
//!
//! - **Chat**      → answer generation
//! - **Embedding** → chunk and query vectors
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_PROVIDER`     = `openai` (default) or `ollama`
//! - `LLM_MODEL`        = chat model (provider default, see [`default_models`])
//! - `EMBEDDING_MODEL`  = embedding model (provider default, see [`default_models`])
//! - `LLM_MAX_TOKENS`   = optional max tokens (u32)
//! - `LLM_TIMEOUT_SECS` = request timeout (default 120)
//!
//! OpenAI-specific:
//! - `OPENAI_API_KEY`  = bearer token (mandatory)
//! - `OPENAI_BASE_URL` = endpoint base (default `https://api.openai.com`)
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (default `http://localhost:11434`)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, env_opt_u32, env_opt_u64, env_or, must_env,
        validate_http_endpoint,
    },
};

pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_OLLAMA_CHAT_MODEL: &str = "llama3";
pub const DEFAULT_OLLAMA_EMBEDDING_MODEL: &str = "nomic-embed-text";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Reads `LLM_PROVIDER` (defaults to OpenAI).
pub fn provider_from_env() -> Result<LlmProvider, AiLlmError> {
    Ok(env_or("LLM_PROVIDER", "openai").parse::<LlmProvider>()?)
}

/// `(chat, embedding)` model names used when `LLM_MODEL` / `EMBEDDING_MODEL`
/// are unset. Each provider only serves its own model catalogue.
pub fn default_models(provider: LlmProvider) -> (&'static str, &'static str) {
    match provider {
        LlmProvider::OpenAI => (DEFAULT_CHAT_MODEL, DEFAULT_EMBEDDING_MODEL),
        LlmProvider::Ollama => (DEFAULT_OLLAMA_CHAT_MODEL, DEFAULT_OLLAMA_EMBEDDING_MODEL),
    }
}

/// Resolves the Ollama endpoint.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
/// 3. [`DEFAULT_OLLAMA_URL`]
fn ollama_endpoint() -> Result<String, AiLlmError> {
    if let Ok(url) = std::env::var("OLLAMA_URL") {
        if !url.trim().is_empty() {
            validate_http_endpoint("OLLAMA_URL", url.trim())?;
            return Ok(url.trim().to_string());
        }
    }
    if let Ok(port) = std::env::var("OLLAMA_PORT") {
        if !port.trim().is_empty() {
            let _ = port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "OLLAMA_PORT",
                    reason: "expected u16 (1..=65535)",
                })?;
            return Ok(format!("http://localhost:{}", port.trim()));
        }
    }
    Ok(DEFAULT_OLLAMA_URL.to_string())
}

/// Endpoint + credentials for a provider.
fn provider_access(provider: LlmProvider) -> Result<(String, Option<String>), AiLlmError> {
    match provider {
        LlmProvider::OpenAI => {
            let endpoint = env_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL);
            validate_http_endpoint("OPENAI_BASE_URL", &endpoint)?;
            let key = must_env("OPENAI_API_KEY")?;
            Ok((endpoint, Some(key)))
        }
        LlmProvider::Ollama => Ok((ollama_endpoint()?, None)),
    }
}

/// Constructs the **chat** config used for answer generation.
///
/// The temperature is left unset so the provider default applies; callers
/// that need a different one pass it per request.
pub fn config_chat() -> Result<LlmModelConfig, AiLlmError> {
    let provider = provider_from_env()?;
    let (endpoint, api_key) = provider_access(provider)?;

    Ok(LlmModelConfig {
        provider,
        model: env_or("LLM_MODEL", default_models(provider).0),
        endpoint,
        api_key,
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature: None,
        timeout_secs: Some(env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS)),
    })
}

/// Constructs the **embedding** config.
///
/// The model must be the same at ingestion and at query time.
pub fn config_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let provider = provider_from_env()?;
    let (endpoint, api_key) = provider_access(provider)?;

    Ok(LlmModelConfig {
        provider,
        model: env_or("EMBEDDING_MODEL", default_models(provider).1),
        endpoint,
        api_key,
        max_tokens: None,
        temperature: None,
        timeout_secs: Some(env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS)),
    })
}
