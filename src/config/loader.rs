use crate::config::config::AppConfig;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::PathBuf;

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从默认路径加载配置
    ///
    /// 搜索路径：
    /// 1. ./parley.toml
    /// 2. 环境变量（PARLEY_ 前缀）
    pub fn load() -> Result<AppConfig, figment::Error> {
        let figment = Figment::new()
            .merge(Toml::file("parley.toml"))
            .merge(Env::prefixed("PARLEY_").split("_").global());

        figment.extract()
    }

    /// 从指定路径加载配置
    pub fn load_from(path: PathBuf) -> Result<AppConfig, figment::Error> {
        let figment = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("PARLEY_").split("_").global());

        figment.extract()
    }

    /// 验证配置
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }

        if !(0.0..=1.0).contains(&config.nlp.handoff_threshold) {
            return Err(ConfigValidationError::InvalidThreshold);
        }

        if config.nlp.follow_up_limit == 0 {
            return Err(ConfigValidationError::InvalidFollowUpLimit);
        }

        Ok(())
    }
}

/// 配置验证错误
#[derive(thiserror::Error, Debug)]
pub enum ConfigValidationError {
    #[error("服务端口无效，必须大于 0")]
    InvalidPort,

    #[error("分流阈值无效，必须在 0.0 到 1.0 之间")]
    InvalidThreshold,

    #[error("追问数量上限无效，必须大于 0")]
    InvalidFollowUpLimit,
}

/// 获取默认配置文件路径
pub fn default_config_path() -> PathBuf {
    PathBuf::from("parley.toml")
}
