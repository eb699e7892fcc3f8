//! HTTP surface wiring retrieval → claims → answer.
//!
//! Thin wrappers over the pipeline in `answer-engine`; no independent
//! design content lives here.

use std::env;
use std::sync::Arc;

mod core;
mod error_handler;
mod routes;

pub use error_handler::{AppError, AppResult};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tracing::info;

use crate::core::app_state::AppState;
use crate::routes::{ask::ask_question_route::ask_question, health_route::health};

/// Builds the application state, binds `API_ADDRESS` (default
/// `0.0.0.0:8000`), and serves until ctrl-c.
///
/// # Errors
/// Returns `AppError` when the pipeline cannot be wired or the listener
/// cannot be bound.
pub async fn start() -> Result<(), AppError> {
    let state = Arc::new(AppState::from_env()?);

    let host_url = env::var("API_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

    let app = Router::new()
        .route("/health", get(health))
        .route("/ask", post(ask_question))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!("listening on {host_url}");

    // Start server with graceful shutdown on Ctrl+C.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
}
