use crate::observability::AppMetrics;
use crate::services::chat::ChatService;
use crate::storage::session_store::SessionStore;
use std::sync::Arc;

/// Application state containing all shared services
#[derive(Clone)]
pub struct AppState {
    /// Chat service driving the intent pipeline
    pub chat_service: Arc<dyn ChatService>,
    /// Session store for direct session lookup and lifecycle operations
    pub session_store: Arc<dyn SessionStore>,
    /// Application metrics
    pub metrics: Arc<AppMetrics>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("chat_service", &"Arc<dyn ChatService>")
            .field("session_store", &"Arc<dyn SessionStore>")
            .field("metrics", &"Arc<AppMetrics>")
            .finish()
    }
}

impl AppState {
    /// Create new application state
    pub fn new(
        chat_service: Box<dyn ChatService>,
        session_store: Arc<dyn SessionStore>,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            chat_service: Arc::from(chat_service),
            session_store,
            metrics,
        }
    }
}
