//! Shared LLM access for the pipeline: one service object that owns a
//! **chat** profile (answer generation) and an **embedding** profile
//! (chunk and query vectors), backed by OpenAI or a local Ollama runtime.

pub mod config;
pub mod error_handler;
pub mod service_profiles;
pub mod services;

pub use config::{default_config, llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, Result};
pub use service_profiles::LlmServiceProfiles;
