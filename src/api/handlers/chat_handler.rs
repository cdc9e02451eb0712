use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::debug;

use crate::{
    api::{
        app_state::AppState,
        dto::chat_dto::{ChatRequest, ChatResponse, IntentResponse},
    },
    error::AppError,
};

pub async fn post_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    // 过长输入直接拒绝，空输入交给管线走兜底
    if request.message.len() > 4096 {
        return Err(AppError::Validation("message too long".to_string()));
    }

    debug!(session_id = ?request.session_id, "processing chat turn");

    let outcome = state
        .chat_service
        .handle_message(
            request.session_id.as_deref(),
            &request.message,
            request.context.as_ref(),
        )
        .await?;

    state.metrics.record_turn(outcome.handled);
    if outcome.session_created {
        state.metrics.record_session_created();
    }

    let response = ChatResponse {
        session_id: outcome.session_id,
        text: outcome.reply.text,
        follow_up_questions: outcome.reply.follow_up_questions,
        intent: IntentResponse {
            category: outcome.intent.category,
            confidence: outcome.intent.confidence,
            entities: outcome.intent.entities,
        },
        stage: outcome.stage,
        handled: outcome.handled,
        metadata: outcome.reply.metadata,
    };

    Ok((StatusCode::OK, Json(response)))
}
