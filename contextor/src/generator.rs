//! Text-generation seam used by [`crate::Contextor`].

use std::{future::Future, pin::Pin, sync::Arc};

use ai_llm_service::LlmServiceProfiles;

use crate::error::ContextorError;

pub type GenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, ContextorError>> + Send + 'a>>;

/// Anything that turns a finished prompt into an answer.
pub trait TextGenerator: Send + Sync {
    /// `temperature == None` keeps the backend's configured default.
    fn generate<'a>(&'a self, prompt: &'a str, temperature: Option<f32>) -> GenerateFuture<'a>;
}

/// Generator backed by the **chat** profile of [`LlmServiceProfiles`].
#[derive(Clone)]
pub struct LlmGenerator {
    svc: Arc<LlmServiceProfiles>,
}

impl LlmGenerator {
    pub fn new(svc: Arc<LlmServiceProfiles>) -> Self {
        Self { svc }
    }
}

impl TextGenerator for LlmGenerator {
    fn generate<'a>(&'a self, prompt: &'a str, temperature: Option<f32>) -> GenerateFuture<'a> {
        Box::pin(async move { Ok(self.svc.generate(prompt, None, temperature).await?) })
    }
}
