//! Process configuration read from the environment at startup.
//!
//! | Variable | Required | Default |
//! |---|---|---|
//! | `SHIFTS_DATABASE_URL` | yes | |
//! | `SHIFTS_API_KEY` | yes | |
//! | `SHIFTS_BIND_ADDR` | no | `127.0.0.1:3000` |
//! | `SHIFTS_CORS_ORIGIN` | no | `http://localhost:8080` |

use axum::http::HeaderValue;
use std::fmt;
use std::net::SocketAddr;
use thiserror::Error;

pub const DATABASE_URL_VAR: &str = "SHIFTS_DATABASE_URL";
pub const API_KEY_VAR: &str = "SHIFTS_API_KEY";
pub const BIND_ADDR_VAR: &str = "SHIFTS_BIND_ADDR";
pub const CORS_ORIGIN_VAR: &str = "SHIFTS_CORS_ORIGIN";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Clone)]
pub struct Config {
    /// Database service URL
    pub database_url: String,
    /// Key every `/api` request must present
    pub api_key: String,
    pub bind_addr: SocketAddr,
    /// Browser origin allowed by CORS
    pub cors_origin: HeaderValue,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("api_key", &"<redacted>")
            .field("bind_addr", &self.bind_addr)
            .field("cors_origin", &self.cors_origin)
            .finish()
    }
}

impl Config {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let database_url = required(DATABASE_URL_VAR)?;
        let api_key = required(API_KEY_VAR)?;

        let bind_addr_raw = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr_raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: BIND_ADDR_VAR,
                value: bind_addr_raw.clone(),
                reason: e.to_string(),
            })?;

        let cors_origin_raw =
            lookup(CORS_ORIGIN_VAR).unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());
        let cors_origin = cors_origin_raw
            .parse::<HeaderValue>()
            .map_err(|e| ConfigError::Invalid {
                name: CORS_ORIGIN_VAR,
                value: cors_origin_raw.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            database_url,
            api_key,
            bind_addr,
            cors_origin,
        })
    }
}
