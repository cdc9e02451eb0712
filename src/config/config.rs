use serde::{Deserialize, Serialize};

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务地址
    pub host: String,
    /// 服务端口
    pub port: u16,
    /// 请求超时（秒）
    pub request_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout: 30,
        }
    }
}

/// 对话管线配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NlpConfig {
    /// 会话意图历史上限（0 表示无上限）
    pub history_limit: usize,
    /// 宿主分流阈值：置信度达到该值且类别可识别时使用管线响应
    pub handoff_threshold: f64,
    /// 单次响应的追问数量上限
    pub follow_up_limit: usize,
}

impl Default for NlpConfig {
    fn default() -> Self {
        Self {
            history_limit: 50,
            handoff_threshold: 0.5,
            follow_up_limit: 3,
        }
    }
}

/// 会话生命周期配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// 空闲超时（秒），0 表示永不过期
    pub idle_timeout_secs: u64,
    /// 过期会话清扫间隔（秒）
    pub cleanup_interval_secs: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 3600,
            cleanup_interval_secs: 300,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 结构化日志格式
    pub structured: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            structured: false,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// 服务器配置
    pub server: ServerConfig,
    /// 对话管线配置
    pub nlp: NlpConfig,
    /// 会话生命周期配置
    pub session: SessionSettings,
    /// 日志配置
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.nlp.history_limit, 50);
        assert_eq!(config.nlp.handoff_threshold, 0.5);
        assert_eq!(config.session.idle_timeout_secs, 3600);
        assert_eq!(config.logging.level, "info");
    }
}
