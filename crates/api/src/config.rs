//! Process configuration, read from environment variables.
//!
//! | variable                | default          |
//! |-------------------------|------------------|
//! | `BIND_ADDR`             | `0.0.0.0:8000`   |
//! | `USE_PERSISTENT_STORES` | `false`          |
//! | `DATABASE_URL`          | required when persistent |
//! | `DATABASE_MAX_CONNECTIONS` | `10`          |
//! | `CREDENTIAL_KEY`        | random per process |
//! | `LOG_FORMAT`            | `json`           |

use std::net::SocketAddr;

use thiserror::Error;

use postboard_auth::{CredentialError, CredentialKey};
use postboard_observability::{LogFormat, UnknownLogFormat};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var}: {message}")]
    Invalid { var: &'static str, message: String },

    #[error("{0} must be set when USE_PERSISTENT_STORES=true")]
    Missing(&'static str),

    #[error("CREDENTIAL_KEY: {0}")]
    CredentialKey(#[from] CredentialError),

    #[error("LOG_FORMAT: {0}")]
    LogFormat(#[from] UnknownLogFormat),
}

/// Which document store backs the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    InMemory,
    Postgres { url: String, max_connections: u32 },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreConfig,
    /// `None` means a fresh key is generated at startup.
    pub credential_key: Option<CredentialKey>,
    pub log_format: LogFormat,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: "BIND_ADDR",
                message: e.to_string(),
            })?;

        let use_persistent = match get("USE_PERSISTENT_STORES") {
            Some(v) => v.parse::<bool>().map_err(|e| ConfigError::Invalid {
                var: "USE_PERSISTENT_STORES",
                message: e.to_string(),
            })?,
            None => false,
        };

        let store = if use_persistent {
            let url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
            let max_connections = match get("DATABASE_MAX_CONNECTIONS") {
                Some(v) => v.parse::<u32>().map_err(|e| ConfigError::Invalid {
                    var: "DATABASE_MAX_CONNECTIONS",
                    message: e.to_string(),
                })?,
                None => DEFAULT_MAX_CONNECTIONS,
            };
            StoreConfig::Postgres { url, max_connections }
        } else {
            StoreConfig::InMemory
        };

        let credential_key = get("CREDENTIAL_KEY")
            .map(|hex| CredentialKey::from_hex(&hex))
            .transpose()?;

        let log_format = get("LOG_FORMAT")
            .map(|v| v.parse::<LogFormat>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            bind_addr,
            store,
            credential_key,
            log_format,
        })
    }
}
