use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::auth::password;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_TOKEN_EXPIRATION_SECS: u64 = 3600;
/// One year
pub const MAX_TOKEN_EXPIRATION_SECS: u64 = 365 * 24 * 3600;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Process-wide settings, read once at startup and handed to `AppState`.
#[derive(Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub token_expiration: Duration,
    pub bcrypt_cost: u32,
}

impl AppConfig {
    /// Reads the configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let database_url = get("DATABASE_URL");

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        let token_expiration_secs = match get("TOKEN_EXPIRATION_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                name: "TOKEN_EXPIRATION_SECS",
                reason: e.to_string(),
            })?,
            None => DEFAULT_TOKEN_EXPIRATION_SECS,
        };
        if !(1..=MAX_TOKEN_EXPIRATION_SECS).contains(&token_expiration_secs) {
            return Err(ConfigError::Invalid {
                name: "TOKEN_EXPIRATION_SECS",
                reason: format!("must be between 1 and {MAX_TOKEN_EXPIRATION_SECS}"),
            });
        }

        let bcrypt_cost = match get("BCRYPT_COST") {
            Some(raw) => raw.parse::<u32>().map_err(|e| ConfigError::Invalid {
                name: "BCRYPT_COST",
                reason: e.to_string(),
            })?,
            None => password::DEFAULT_COST,
        };
        if !(password::MIN_COST..=password::MAX_COST).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                name: "BCRYPT_COST",
                reason: format!(
                    "must be between {} and {}",
                    password::MIN_COST,
                    password::MAX_COST
                ),
            });
        }

        debug!(
            %bind_addr,
            token_expiration_secs,
            bcrypt_cost,
            persistent_store = database_url.is_some(),
            "Loaded application configuration"
        );

        Ok(Self {
            jwt_secret,
            database_url,
            bind_addr,
            token_expiration: Duration::from_secs(token_expiration_secs),
            bcrypt_cost,
        })
    }
}

// Keeps the secret and the connection string out of logs.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("jwt_secret", &"<redacted>")
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("bind_addr", &self.bind_addr)
            .field("token_expiration", &self.token_expiration)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}
