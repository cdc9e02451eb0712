//! Session Routes
//!
//! 定义会话相关的 API 路由。

use crate::api::handlers::session_handler::*;
use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::api::app_state::AppState;

/// 创建会话路由器
pub fn create_session_router() -> Router<AppState> {
    Router::new()
        .route("/sessions/:id", get(get_session))
        .route("/sessions/:id", delete(delete_session))
        .route("/sessions/cleanup", post(cleanup_sessions))
}
