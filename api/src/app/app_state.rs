use std::sync::Arc;

use contextor::Contextor;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Loaded RAG service; `None` until an index has been loaded.
    pub contextor: Option<Arc<Contextor>>,
    /// Generation temperature for `/api/query`.
    pub temperature: f32,
}

impl AppState {
    pub fn new(contextor: Arc<Contextor>) -> Self {
        let temperature = contextor.config().api_temperature;
        Self {
            contextor: Some(contextor),
            temperature,
        }
    }

    /// State without a knowledge base; queries fail and health reports it.
    pub fn unloaded() -> Self {
        Self {
            contextor: None,
            temperature: contextor::cfg::DEFAULT_API_TEMPERATURE,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.contextor.is_some()
    }
}
