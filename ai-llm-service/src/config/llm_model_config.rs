use crate::config::llm_provider::LlmProvider;

/// Configuration for an LLM model invocation.
///
/// The same struct describes both the chat profile and the embedding
/// profile; fields that do not apply to embeddings (`temperature`,
/// `max_tokens`) are simply ignored there.
///
/// # Examples
///
/// ```
/// use ai_llm_service::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::OpenAI,
///     model: "gpt-4o-mini".to_string(),
///     endpoint: "https://api.openai.com".to_string(),
///     api_key: Some("sk-...".to_string()),
///     max_tokens: None,
///     temperature: None,
///     timeout_secs: Some(120),
/// };
/// assert_eq!(cfg.model, "gpt-4o-mini");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The LLM provider/backend.
    pub provider: LlmProvider,

    /// Model identifier string (e.g., `"gpt-4o-mini"`, `"text-embedding-3-small"`).
    pub model: String,

    /// Endpoint base URL (without the `/v1/...` or `/api/...` suffix).
    pub endpoint: String,

    /// Optional API key for authentication (required by OpenAI).
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature. `None` leaves the provider default in place.
    pub temperature: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}
