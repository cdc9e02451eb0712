use parley::api::{self, app_state::AppState};
use parley::config::loader::ConfigLoader;
use parley::knowledge::{create_product_kb, create_sports_kb};
use parley::observability::{create_observability_router, init_tracing, ObservabilityState};
use parley::services::create_chat_service;
use parley::storage::{create_session_store, SessionStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::load()?;
    init_tracing("parley", &config.logging);
    info!("Starting Parley...");

    ConfigLoader::validate(&config)?;
    info!("Configuration loaded successfully");

    let session_store: Arc<dyn SessionStore> =
        Arc::from(create_session_store(config.session.idle_timeout_secs));
    info!("Session store initialized");

    let product_kb = Arc::from(create_product_kb());
    let sports_kb = Arc::from(create_sports_kb());
    info!("Knowledge bases initialized");

    let chat_service = create_chat_service(
        &config.nlp,
        session_store.clone(),
        product_kb,
        sports_kb,
    );
    info!("Chat service initialized");

    let observability_state = Arc::new(ObservabilityState::new(
        env!("CARGO_PKG_VERSION").to_string(),
    ));

    let app_state = AppState::new(
        chat_service,
        session_store.clone(),
        observability_state.metrics.clone(),
    );
    info!("Application state created");

    spawn_session_sweeper(
        session_store,
        observability_state.clone(),
        config.session.cleanup_interval_secs,
    );

    let api_router = api::create_router(app_state);
    let router = create_observability_router(observability_state).merge(api_router);
    info!("API router created with observability endpoints");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}

/// 周期性清扫过期会话的后台任务
fn spawn_session_sweeper(
    store: Arc<dyn SessionStore>,
    observability: Arc<ObservabilityState>,
    interval_secs: u64,
) {
    if interval_secs == 0 {
        info!("Session sweeper disabled");
        return;
    }

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        loop {
            ticker.tick().await;
            match store.cleanup_expired().await {
                Ok(removed) => {
                    if removed > 0 {
                        observability.metrics.record_sessions_expired(removed as u64);
                    }
                }
                Err(e) => warn!("session cleanup failed: {}", e),
            }
        }
    });
}
