//! 配置模块

pub mod config;
pub mod loader;

pub use config::{AppConfig, LoggingConfig, NlpConfig, ServerConfig, SessionSettings};
pub use loader::ConfigLoader;
