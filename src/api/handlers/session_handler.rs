use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::session_dto::*},
    error::AppError,
};

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Getting session: {}", id);

    let session = state
        .session_store
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Session not found: {}", id)))?;

    Ok(Json(SessionResponse::from(session)))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Deleting session: {}", id);

    let removed = state.session_store.delete(&id).await?;
    if !removed {
        return Err(AppError::NotFound(format!("Session not found: {}", id)));
    }

    let response = DeleteSessionResponse {
        id,
        message: "Session deleted successfully".to_string(),
    };

    Ok(Json(response))
}

pub async fn cleanup_sessions(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let removed = state.session_store.cleanup_expired().await?;
    state.metrics.record_sessions_expired(removed as u64);

    Ok((StatusCode::OK, Json(CleanupResponse { removed })))
}
