//! Process configuration, read from environment variables.

use std::net::SocketAddr;

use shopcart_observability::LogFormat;
use thiserror::Error;

pub const BIND_ADDR_VAR: &str = "SHOPCART_BIND_ADDR";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const DB_MAX_CONNECTIONS_VAR: &str = "SHOPCART_DB_MAX_CONNECTIONS";
pub const CORS_ORIGINS_VAR: &str = "SHOPCART_CORS_ORIGINS";
pub const LOG_FORMAT_VAR: &str = "SHOPCART_LOG_FORMAT";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Postgres connection string; `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    /// Allowed CORS origins; empty means any origin.
    pub cors_origins: Vec<String>,
    pub log_format: LogFormat,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            database_url: None,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            cors_origins: Vec::new(),
            log_format: LogFormat::default(),
        }
    }
}

impl ApiConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Unset or blank keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = get(BIND_ADDR_VAR)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| invalid(BIND_ADDR_VAR, e))?;

        let db_max_connections = match get(DB_MAX_CONNECTIONS_VAR) {
            Some(raw) => match raw.parse::<u32>() {
                Ok(0) => return Err(invalid(DB_MAX_CONNECTIONS_VAR, "must be at least 1")),
                Ok(n) => n,
                Err(e) => return Err(invalid(DB_MAX_CONNECTIONS_VAR, e)),
            },
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };

        let cors_origins = get(CORS_ORIGINS_VAR)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        let log_format = match get(LOG_FORMAT_VAR) {
            Some(raw) => raw.parse::<LogFormat>().map_err(|e| invalid(LOG_FORMAT_VAR, e))?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bind_addr,
            database_url: get(DATABASE_URL_VAR),
            db_max_connections,
            cors_origins,
            log_format,
        })
    }
}

fn invalid(key: &'static str, err: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        key,
        message: err.to_string(),
    }
}
