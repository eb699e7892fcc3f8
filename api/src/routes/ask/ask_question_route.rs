//! POST /ask — answers a question with citation-grounded claims.

use std::sync::Arc;

use axum::{Json, extract::State};
use tracing::error;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::ask::ask_request::{AskRequest, AskResponse},
};

/// Handler: POST /ask
///
/// 1. embed & search (Qdrant)
/// 2. turn top passages into short claims (no-LLM baseline)
/// 3. (optional) reflect to produce follow-up queries
/// 4. compose the final answer
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/ask \
///   -H 'content-type: application/json' \
///   -d '{"question":"What is the Néron–Severi group?","top_k":8}'
/// ```
pub async fn ask_question(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AskRequest>,
) -> AppResult<Json<AskResponse>> {
    let outcome = state
        .pipeline
        .ask(&body.question, body.top_k)
        .await
        .map_err(|e| {
            // Full detail stays server-side; the caller sees a generic message.
            error!("ask pipeline failed: {e}");
            AppError::Internal
        })?;

    Ok(Json(AskResponse {
        answer: outcome.answer,
        claims: outcome.claims,
        passages: outcome.passages,
        followups: outcome.followups,
    }))
}
