//! 应用运行配置加载。

use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 存储后端选择。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// 内存存储：演示与测试用，进程退出即丢失。
    Memory,
    /// PostgreSQL 存储：生产环境使用，需要 COLDWATCH_DATABASE_URL。
    Postgres,
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub ping_interval_seconds: u64,
    pub recovery_delay_seconds: u64,
    pub alert_dedup_window_minutes: u64,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_addr =
            env::var("COLDWATCH_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let store_backend = read_store_backend("COLDWATCH_STORE")?;
        let database_url = read_optional("COLDWATCH_DATABASE_URL");
        // postgres 后端必须显式给出数据库地址
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("COLDWATCH_DATABASE_URL".to_string()));
        }
        let ping_interval_seconds = read_u64_with_default("COLDWATCH_PING_INTERVAL_SECONDS", 30)?;
        let recovery_delay_seconds =
            read_u64_with_default("COLDWATCH_RECOVERY_DELAY_SECONDS", 30)?;
        let alert_dedup_window_minutes =
            read_u64_with_default("COLDWATCH_ALERT_DEDUP_WINDOW_MINUTES", 5)?;

        Ok(Self {
            http_addr,
            store_backend,
            database_url,
            ping_interval_seconds,
            recovery_delay_seconds,
            alert_dedup_window_minutes,
        })
    }
}

/// 读取存储后端选择，缺省为内存实现。
fn read_store_backend(key: &str) -> Result<StoreBackend, ConfigError> {
    let value = match env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => return Ok(StoreBackend::Memory),
    };
    match value.to_ascii_lowercase().as_str() {
        "memory" => Ok(StoreBackend::Memory),
        "postgres" => Ok(StoreBackend::Postgres),
        _ => Err(ConfigError::Invalid(key.to_string(), value)),
    }
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}
