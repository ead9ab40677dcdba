//! Application settings loaded via OrthoConfig.

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono_tz::Tz;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::parse_timezone;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Settings problems detected after loading.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid ROOMBOOK_BIND_ADDR '{value}': {message}")]
    BindAddr { value: String, message: String },
    #[error("invalid ROOMBOOK_DEFAULT_TIMEZONE '{value}'")]
    Timezone { value: String },
    #[error("ROOMBOOK_DB_MAX_CONNECTIONS must be at least 1")]
    PoolSize,
}

/// Process-level configuration, read from `ROOMBOOK_*` variables.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ROOMBOOK")]
pub struct AppSettings {
    /// PostgreSQL connection string; the in-memory store is used when unset.
    pub database_url: Option<String>,
    /// Listener address.
    pub bind_addr: Option<String>,
    /// IANA zone applied to anonymous requests.
    pub default_timezone: Option<String>,
    /// Apply embedded migrations before serving; on unless set to `false`.
    pub run_migrations: Option<bool>,
    /// Upper bound for pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Accounts to register at startup.
    pub seed_file: Option<PathBuf>,
}

impl AppSettings {
    /// Parse the configured listener address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|error: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: error.to_string(),
        })
    }

    /// Resolve the default display timezone, `UTC` when unset.
    pub fn default_timezone(&self) -> Result<Tz, SettingsError> {
        match self.default_timezone.as_deref() {
            None => Ok(chrono_tz::UTC),
            Some(raw) => parse_timezone(raw).map_err(|_| SettingsError::Timezone {
                value: raw.to_owned(),
            }),
        }
    }

    /// Whether embedded migrations run before serving.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    pub fn db_max_connections(&self) -> Result<u32, SettingsError> {
        match self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS) {
            0 => Err(SettingsError::PoolSize),
            size => Ok(size),
        }
    }
}
