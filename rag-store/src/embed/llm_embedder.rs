//! Embedding provider backed by the shared LLM service (OpenAI or Ollama).

use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;

use crate::embed::{EmbedFuture, EmbeddingsProvider};
use crate::errors::RagError;

/// Embeds through the **embedding** profile of [`LlmServiceProfiles`].
#[derive(Clone)]
pub struct LlmEmbedder {
    svc: Arc<LlmServiceProfiles>,
    model: String,
}

impl LlmEmbedder {
    pub fn new(svc: Arc<LlmServiceProfiles>) -> Self {
        let model = svc.profiles().1.model.clone();
        Self { svc, model }
    }
}

impl EmbeddingsProvider for LlmEmbedder {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a, Vec<f32>> {
        Box::pin(async move {
            self.svc
                .embed(text)
                .await
                .map_err(|e| RagError::Embedding(e.to_string()))
        })
    }

    fn embed_batch<'a>(&'a self, texts: &'a [&'a str]) -> EmbedFuture<'a, Vec<Vec<f32>>> {
        Box::pin(async move {
            self.svc
                .embed_batch(texts)
                .await
                .map_err(|e| RagError::Embedding(e.to_string()))
        })
    }
}
