//! qm-config - 配置加载库

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use secrecy::Secret;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// 后端 API 配置
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// 查询缓存配置（秒）
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// 质量记录、日产量、统计等频繁变化的数据
    #[serde(default = "default_records_ttl")]
    pub records_ttl_secs: u64,
    /// 部品、工序等参考数据
    #[serde(default = "default_reference_ttl")]
    pub reference_ttl_secs: u64,
    /// 系统代码（阈值等）
    #[serde(default = "default_system_codes_ttl")]
    pub system_codes_ttl_secs: u64,
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

fn default_records_ttl() -> u64 {
    120 // 2 分钟
}

fn default_reference_ttl() -> u64 {
    300 // 5 分钟
}

fn default_system_codes_ttl() -> u64 {
    600 // 10 分钟
}

fn default_max_capacity() -> u64 {
    10_000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            records_ttl_secs: default_records_ttl(),
            reference_ttl_secs: default_reference_ttl(),
            system_codes_ttl_secs: default_system_codes_ttl(),
            max_capacity: default_max_capacity(),
        }
    }
}

/// 会话持久化配置
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_file")]
    pub file: PathBuf,
}

fn default_session_file() -> PathBuf {
    PathBuf::from(".qm-session.json")
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            file: default_session_file(),
        }
    }
}

/// 非交互登录凭据（可选）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    pub username: Option<String>,
    pub password: Option<Secret<String>>,
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json: bool,
    /// 安装 Prometheus 记录器，命令结束后输出指标快照
    #[serde(default)]
    pub metrics: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
            metrics: false,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_env")]
    pub app_env: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn default_app_env() -> String {
    "development".to_string()
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 顺序：`{dir}/default.toml` → `{dir}/{APP_ENV}.toml` → `QM_` 前缀环境变量（`__` 表示嵌套）
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| default_app_env());

        let figment = Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed("QM_").split("__"));

        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api.base_url must not be empty".into()));
        }
        if self.cache.records_ttl_secs == 0 {
            return Err(ConfigError::Invalid(
                "cache.records_ttl_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// 是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}
