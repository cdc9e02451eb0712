//! API 模块
//!
//! 提供 REST API 支持。

pub mod app_state;
pub mod dto;
pub mod handlers;
pub mod routes;

use crate::api::app_state::AppState;
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn create_router(app_state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::chat_routes::create_chat_router())
        .merge(routes::session_routes::create_session_router());

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
