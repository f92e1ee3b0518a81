//! HTTP surface of the knowledge base: a static page, `POST /api/query` and
//! `GET /api/health`.

mod app;
mod error_handler;
mod routes;

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};

pub use crate::app::app_state::AppState;
pub use crate::error_handler::{AppError, AppResult};

use crate::routes::{health_route::health, index_page::index_page, query::query_route::query};

/// Builds the application router around shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/api/query", post(query))
        .route("/api/health", get(health))
        .with_state(state)
}

/// Binds `address` and serves until Ctrl+C.
///
/// # Errors
/// [`AppError::Bind`] if the address cannot be bound, [`AppError::Server`] if
/// the server stops with an I/O error.
pub async fn start(address: &str, state: AppState) -> Result<(), AppError> {
    let listener = TcpListener::bind(address).await.map_err(AppError::Bind)?;
    info!("listening on http://{}", address);
    serve(listener, state, shutdown_signal()).await
}

/// Serves on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(Arc::new(state)))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(AppError::Server)
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
