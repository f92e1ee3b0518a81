//! Shared LLM service with two profiles: `chat` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - HTTP clients are built eagerly, so configuration errors surface at startup.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::LlmServiceProfiles;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), ai_llm_service::AiLlmError> {
//! let svc = Arc::new(LlmServiceProfiles::from_env()?);
//!
//! let txt = svc.generate("Hello world", None, None).await?;
//! println!("answer: {txt}");
//!
//! let emb = svc.embed("Ferris").await?;
//! println!("embedding dim = {}", emb.len());
//! # Ok(()) }
//! ```

use tracing::info;

use crate::{
    config::{default_config, llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, Provider, ProviderError, ProviderErrorKind},
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

/// A provider client bound to one profile.
enum Backend {
    Ollama(OllamaService),
    OpenAI(OpenAiService),
}

impl Backend {
    fn new(cfg: &LlmModelConfig) -> Result<Self, AiLlmError> {
        Ok(match cfg.provider {
            LlmProvider::Ollama => Backend::Ollama(OllamaService::new(cfg.clone())?),
            LlmProvider::OpenAI => Backend::OpenAI(OpenAiService::new(cfg.clone())?),
        })
    }
}

/// Shared service that manages the **chat** and **embedding** profiles.
pub struct LlmServiceProfiles {
    chat: LlmModelConfig,
    embedding: LlmModelConfig,
    chat_backend: Backend,
    embedding_backend: Backend,
}

impl LlmServiceProfiles {
    /// Creates a new service with both profiles.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if a provider client cannot be constructed
    /// (wrong provider, missing key, invalid endpoint).
    pub fn new(chat: LlmModelConfig, embedding: LlmModelConfig) -> Result<Self, AiLlmError> {
        let chat_backend = Backend::new(&chat)?;
        let embedding_backend = Backend::new(&embedding)?;

        info!(
            provider = %chat.provider,
            chat_model = %chat.model,
            embedding_model = %embedding.model,
            "LLM service profiles ready"
        );

        Ok(Self {
            chat,
            embedding,
            chat_backend,
            embedding_backend,
        })
    }

    /// Builds both profiles from the environment (see [`default_config`]).
    pub fn from_env() -> Result<Self, AiLlmError> {
        Self::new(default_config::config_chat()?, default_config::config_embedding()?)
    }

    /// Generates text using the **chat** profile.
    ///
    /// # Arguments
    /// - `prompt`: user prompt.
    /// - `system`: optional system instruction.
    /// - `temperature`: per-call override; `None` keeps the profile setting.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if generation fails.
    pub async fn generate(
        &self,
        prompt: &str,
        system: Option<&str>,
        temperature: Option<f32>,
    ) -> Result<String, AiLlmError> {
        match &self.chat_backend {
            Backend::Ollama(cli) => cli.generate(prompt, system, temperature).await,
            Backend::OpenAI(cli) => cli.generate(prompt, system, temperature).await,
        }
    }

    /// Computes one embedding using the **embedding** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if embedding fails.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        let mut out = self.embed_batch(&[input]).await?;
        out.pop().ok_or_else(|| {
            let provider = match self.embedding.provider {
                LlmProvider::Ollama => Provider::Ollama,
                LlmProvider::OpenAI => Provider::OpenAI,
            };
            ProviderError::new(
                provider,
                ProviderErrorKind::Decode("empty embeddings response".into()),
            )
            .into()
        })
    }

    /// Computes embeddings for several inputs in one request, in input order.
    pub async fn embed_batch(&self, inputs: &[&str]) -> Result<Vec<Vec<f32>>, AiLlmError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }
        match &self.embedding_backend {
            Backend::Ollama(cli) => cli.embeddings(inputs).await,
            Backend::OpenAI(cli) => cli.embeddings(inputs).await,
        }
    }

    /// Returns references to the current profiles `(chat, embedding)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (&self.chat, &self.embedding)
    }
}
