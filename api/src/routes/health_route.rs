//! GET /api/health

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use crate::app::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub vectorstore_loaded: bool,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        vectorstore_loaded: state.is_loaded(),
    })
}
