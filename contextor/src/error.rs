//! Typed error for the contextor crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextorError {
    /// Errors from the underlying rag-store crate (index, embeddings).
    #[error("RAG error: {0}")]
    Rag(#[from] rag_store::RagError),

    /// Text-generation failures.
    #[error("LLM error: {0}")]
    Llm(#[from] ai_llm_service::AiLlmError),

    /// A generator other than the built-in one failed.
    #[error("generation failed: {0}")]
    Generation(String),

    /// The question was empty after trimming.
    #[error("Query cannot be empty")]
    EmptyQuery,

    /// Invalid environment value.
    #[error("config error: {0}")]
    Config(String),
}
