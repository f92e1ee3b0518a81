use std::{fmt, str::FromStr};

use crate::error_handler::ConfigError;

/// Represents the provider (backend) used for inference and embeddings.
///
/// Adding more providers in the future can be done by extending this enum
/// and the dispatch in [`crate::service_profiles::LlmServiceProfiles`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local Ollama runtime for on-device inference.
    Ollama,
    /// OpenAI REST API (chat completions + embeddings).
    OpenAI,
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "chatgpt" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ollama => f.write_str("ollama"),
            Self::OpenAI => f.write_str("openai"),
        }
    }
}
