//! 可观测性模块
//!
//! 提供 Prometheus 指标、结构化日志和健康检查。

use axum::{response::IntoResponse, routing::get, Json, Router};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::config::LoggingConfig;

// ===== Simple Metrics (using atomics for zero-dep implementation) =====

/// 简单应用指标
#[derive(Clone, Default)]
pub struct AppMetrics {
    pub http_requests_total: Arc<AtomicU64>,
    pub http_request_duration_sum: Arc<AtomicU64>,
    pub active_connections: Arc<AtomicUsize>,
    pub turns_total: Arc<AtomicU64>,
    pub turns_unhandled_total: Arc<AtomicU64>,
    pub sessions_created_total: Arc<AtomicU64>,
    pub sessions_expired_total: Arc<AtomicU64>,
    pub errors_total: Arc<AtomicU64>,
}

impl AppMetrics {
    /// 记录 HTTP 请求
    pub fn record_http_request(&self, duration_ms: u64) {
        self.http_requests_total.fetch_add(1, Ordering::SeqCst);
        self.http_request_duration_sum
            .fetch_add(duration_ms, Ordering::SeqCst);
    }

    /// 记录活跃连接
    pub fn record_connection(&self, delta: isize) {
        self.active_connections
            .fetch_add(delta as usize, Ordering::SeqCst);
    }

    /// 记录一轮对话
    pub fn record_turn(&self, handled: bool) {
        self.turns_total.fetch_add(1, Ordering::SeqCst);
        if !handled {
            self.turns_unhandled_total.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// 记录新建会话
    pub fn record_session_created(&self) {
        self.sessions_created_total.fetch_add(1, Ordering::SeqCst);
    }

    /// 记录过期会话清理
    pub fn record_sessions_expired(&self, count: u64) {
        self.sessions_expired_total.fetch_add(count, Ordering::SeqCst);
    }

    /// 记录错误
    pub fn record_error(&self) {
        self.errors_total.fetch_add(1, Ordering::SeqCst);
    }

    /// 生成 Prometheus 格式指标
    pub fn gather(&self) -> String {
        format!(
            r#"# HELP http_requests_total Total HTTP requests
# TYPE http_requests_total counter
http_requests_total {}
# HELP http_request_duration_seconds HTTP request duration in seconds
# TYPE http_request_duration_seconds histogram
http_request_duration_seconds_sum {}
http_request_duration_seconds_count {}
# HELP active_connections Active HTTP connections
# TYPE active_connections gauge
active_connections {}
# HELP turns_total Total conversation turns
# TYPE turns_total counter
turns_total {}
# HELP turns_unhandled_total Turns escalated to the host
# TYPE turns_unhandled_total counter
turns_unhandled_total {}
# HELP sessions_created_total Total sessions created
# TYPE sessions_created_total counter
sessions_created_total {}
# HELP sessions_expired_total Total sessions removed by idle timeout
# TYPE sessions_expired_total counter
sessions_expired_total {}
# HELP errors_total Total errors
# TYPE errors_total counter
errors_total {}
"#,
            self.http_requests_total.load(Ordering::SeqCst),
            self.http_request_duration_sum.load(Ordering::SeqCst) as f64 / 1000.0,
            self.http_requests_total.load(Ordering::SeqCst),
            self.active_connections.load(Ordering::SeqCst),
            self.turns_total.load(Ordering::SeqCst),
            self.turns_unhandled_total.load(Ordering::SeqCst),
            self.sessions_created_total.load(Ordering::SeqCst),
            self.sessions_expired_total.load(Ordering::SeqCst),
            self.errors_total.load(Ordering::SeqCst),
        )
    }
}

// ===== Health Check =====

/// 健康检查状态
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_seconds: f64,
}

/// 应用状态（用于健康检查）
#[derive(Clone)]
pub struct ObservabilityState {
    pub metrics: Arc<AppMetrics>,
    pub start_time: DateTime<Utc>,
    pub version: String,
}

impl ObservabilityState {
    pub fn new(version: String) -> Self {
        Self {
            metrics: Arc::new(AppMetrics::default()),
            start_time: Utc::now(),
            version,
        }
    }

    /// 获取应用正常运行时间
    pub fn uptime_seconds(&self) -> f64 {
        (Utc::now() - self.start_time).num_seconds() as f64
    }
}

// ===== Health Check Handlers =====

/// 获取完整健康状态
pub async fn health_check(
    state: axum::extract::State<Arc<ObservabilityState>>,
) -> impl IntoResponse {
    // 管线全部在内存中，无外部依赖，进程能响应即健康
    let health_status = HealthStatus {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        version: state.version.clone(),
        uptime_seconds: state.uptime_seconds(),
    };

    (axum::http::StatusCode::OK, Json(health_status))
}

/// 简单存活检查
pub async fn liveness() -> impl IntoResponse {
    "OK"
}

/// 就绪检查
pub async fn readiness() -> impl IntoResponse {
    (axum::http::StatusCode::OK, "Ready")
}

/// Prometheus 指标端点
pub async fn metrics(state: axum::extract::State<Arc<ObservabilityState>>) -> impl IntoResponse {
    let output = state.metrics.gather();
    (axum::http::StatusCode::OK, output)
}

/// 版本信息端点
pub async fn version(state: axum::extract::State<Arc<ObservabilityState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "version": state.version,
        "uptime_seconds": state.uptime_seconds(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// 创建可观测性路由
pub fn create_observability_router(state: Arc<ObservabilityState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
        .route("/metrics", get(metrics))
        .route("/version", get(version))
        .with_state(state)
}

// ===== Structured Logging =====

/// 初始化结构化日志
pub fn init_tracing(service_name: &str, config: &LoggingConfig) {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| format!("{},{}", config.level, service_name));

    if config.structured {
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_line_number(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
    }
}
