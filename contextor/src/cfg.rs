//! Runtime configuration loaded from environment variables.

use crate::error::ContextorError;

/// Chunks retrieved per question unless `RAG_TOP_K` says otherwise.
pub const DEFAULT_TOP_K: usize = 3;

/// Temperature used by the HTTP answer path unless `API_TEMPERATURE` says otherwise.
pub const DEFAULT_API_TEMPERATURE: f32 = 0.7;

/// Config bag for the answer service.
#[derive(Clone, Debug, PartialEq)]
pub struct ContextorConfig {
    /// Chunks retrieved per question.
    pub top_k: usize,
    /// Temperature for API answers (the CLI keeps the provider default).
    pub api_temperature: f32,
}

impl Default for ContextorConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            api_temperature: DEFAULT_API_TEMPERATURE,
        }
    }
}

impl ContextorConfig {
    /// Build from `RAG_TOP_K` and `API_TEMPERATURE`, falling back to defaults.
    ///
    /// # Errors
    /// `ContextorError::Config` when a variable is set but unparsable or out of range.
    pub fn from_env() -> Result<Self, ContextorError> {
        let cfg = Self {
            top_k: parse("RAG_TOP_K", DEFAULT_TOP_K)?,
            api_temperature: parse("API_TEMPERATURE", DEFAULT_API_TEMPERATURE)?,
        };
        if cfg.top_k == 0 {
            return Err(ContextorError::Config("RAG_TOP_K must be > 0".into()));
        }
        if !(0.0..=2.0).contains(&cfg.api_temperature) {
            return Err(ContextorError::Config(
                "API_TEMPERATURE must be within 0.0..=2.0".into(),
            ));
        }
        Ok(cfg)
    }
}

fn parse<T>(k: &str, dflt: T) -> Result<T, ContextorError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(k) {
        Ok(v) => v
            .trim()
            .parse()
            .map_err(|e| ContextorError::Config(format!("{k}: {e}"))),
        Err(_) => Ok(dflt),
    }
}
