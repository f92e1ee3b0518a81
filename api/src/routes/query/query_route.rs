//! POST /api/query: retrieval + grounded answer.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use contextor::{AskOptions, PromptStyle, QaAnswer, UNKNOWN_SOURCE, prompt::preview};
use tracing::{debug, info};

use crate::{
    app::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::query::query_request::{ContextChunk, QueryRequest, QueryResponse},
};

const PREVIEW_CHARS: usize = 300;

/// Handler: POST /api/query
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:5000/api/query \
///   -H 'content-type: application/json' \
///   -d '{"query":"How much should I keep in an emergency fund?"}'
/// ```
pub async fn query(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> AppResult<Json<QueryResponse>> {
    let Json(body) = payload?;
    let question = body.query.trim();
    if question.is_empty() {
        return Err(AppError::BadRequest("Query cannot be empty".into()));
    }

    let contextor = state.contextor.as_ref().ok_or_else(|| {
        AppError::Internal("Vector store not loaded. Run ingestion first".into())
    })?;

    debug!(query_chars = question.chars().count(), "api query");
    let opts = AskOptions {
        top_k: 0,
        temperature: Some(state.temperature),
        style: PromptStyle::Concise,
    };
    let QaAnswer {
        answer,
        sources,
        context,
    } = contextor.ask(question, opts).await?;

    let context_chunks = context
        .into_iter()
        .map(|c| ContextChunk {
            content: preview(&c.text, PREVIEW_CHARS),
            source: c.source.unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
            score: c.score,
        })
        .collect::<Vec<_>>();

    info!(
        chunks = context_chunks.len(),
        sources = sources.len(),
        "api query answered"
    );
    Ok(Json(QueryResponse {
        answer,
        sources,
        context_chunks,
    }))
}
