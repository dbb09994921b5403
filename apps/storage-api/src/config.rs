//! Configuration for Storage API

use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_or_default, server::ServerConfig};
use database::postgres::PostgresConfig;

pub use core_config::Environment;

/// Where products are kept
#[derive(Clone, Debug)]
pub enum StorageConfig {
    Postgres(PostgresConfig),
    /// Process-local map; contents are lost on restart
    Memory,
}

impl FromEnv for StorageConfig {
    /// - STORAGE_BACKEND: `postgres` (default) or `memory`
    /// - DATABASE_URL and DB_* pool settings when using `postgres`
    fn from_env() -> Result<Self, ConfigError> {
        let backend = env_or_default("STORAGE_BACKEND", "postgres");

        match backend.to_ascii_lowercase().as_str() {
            "postgres" => Ok(StorageConfig::Postgres(PostgresConfig::from_env()?)),
            "memory" => Ok(StorageConfig::Memory),
            _ => Err(ConfigError::InvalidValue {
                key: "STORAGE_BACKEND".to_string(),
                value: backend,
            }),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            server: ServerConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            environment: Environment::from_env(),
        })
    }
}
