//! HTTP request handlers

use super::types::{ErrorResponse, NewConversationResponse, TurnRequest, VersionResponse};
use super::AppState;
use crate::checkpoint::StoreError;
use crate::runtime::ModelClient;
use crate::state_machine::{ConversationState, Metadata};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/conversations", post(create_conversation))
        .route("/api/conversations/:id", get(get_conversation))
        .route("/api/conversations/:id/turns", post(run_turn))
        .route("/api/conversations/:id/stats", get(get_stats))
        .route("/version", get(get_version))
        .with_state(state)
}

async fn create_conversation() -> Json<NewConversationResponse> {
    Json(NewConversationResponse {
        conversation_id: uuid::Uuid::new_v4().to_string(),
    })
}

async fn run_turn(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<TurnRequest>,
) -> Result<Json<ConversationState>, AppError> {
    let final_state = state.engine.run_turn(&id, &req.user_input).await?;
    Ok(Json(final_state))
}

async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConversationState>, AppError> {
    Ok(Json(state.engine.state(&id).await?))
}

async fn get_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Metadata>, AppError> {
    Ok(Json(state.engine.stats(&id).await?))
}

async fn get_version(State(state): State<AppState>) -> Json<VersionResponse> {
    Json(VersionResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        model: state.engine.model().model_id().to_string(),
    })
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
pub enum AppError {
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
