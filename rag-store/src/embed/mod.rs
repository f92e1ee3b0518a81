use std::{future::Future, pin::Pin};

use crate::errors::RagError;

pub mod llm_embedder;

/// Boxed future returned by [`EmbeddingsProvider`] methods.
pub type EmbedFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RagError>> + Send + 'a>>;

/// Provider interface for embedding generation.
///
/// Async because real providers (OpenAI, Ollama) perform HTTP requests.
/// Implement this trait to plug in another backend or a test double.
pub trait EmbeddingsProvider: Send + Sync {
    /// Name of the embedding model, recorded in the index header.
    fn model_name(&self) -> &str;

    /// Embeds a single text.
    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a, Vec<f32>>;

    /// Embeds several texts, returning one vector per input in input order.
    ///
    /// The default implementation calls [`EmbeddingsProvider::embed`] sequentially.
    fn embed_batch<'a>(&'a self, texts: &'a [&'a str]) -> EmbedFuture<'a, Vec<Vec<f32>>> {
        Box::pin(async move {
            let mut out = Vec::with_capacity(texts.len());
            for &text in texts {
                out.push(self.embed(text).await?);
            }
            Ok(out)
        })
    }
}
