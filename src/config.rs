use chrono::Duration;
use std::env;
use std::net::SocketAddr;
use thiserror::Error;
use tracing::warn;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_TOKEN_TTL_HOURS: i64 = 12;
const DEV_SIGNING_KEY: &str = "dev-signing-key-change-in-production";
const DEV_PASSWORD_SALT: &str = "dev-salt-change-in-production";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("{key} must be set when DATABASE_URL is set")]
    Missing { key: &'static str },
}

/// Secrets and lifetimes used by the token service and password hasher
#[derive(Clone)]
pub struct AuthConfig {
    pub signing_key: String,
    pub password_salt: String,
    pub token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(
        signing_key: impl Into<String>,
        password_salt: impl Into<String>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            signing_key: signing_key.into(),
            password_salt: password_salt.into(),
            token_ttl,
        }
    }
}

// Keeps secrets out of debug logs
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("signing_key", &"<redacted>")
            .field("password_salt", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

/// Process-wide configuration, loaded once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// PostgreSQL connection string. In-memory storage is used when absent.
    pub database_url: Option<String>,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Reads PORT, DATABASE_URL, AUTH_SIGNING_KEY, AUTH_SALT and AUTH_TOKEN_TTL_HOURS
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let ttl_hours = parse_or(
            "AUTH_TOKEN_TTL_HOURS",
            lookup("AUTH_TOKEN_TTL_HOURS"),
            DEFAULT_TOKEN_TTL_HOURS,
        )?;
        if ttl_hours <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "AUTH_TOKEN_TTL_HOURS",
                value: ttl_hours.to_string(),
            });
        }

        let database_url = lookup("DATABASE_URL").filter(|url| !url.is_empty());
        let persistent = database_url.is_some();
        let signing_key = secret(&lookup, "AUTH_SIGNING_KEY", DEV_SIGNING_KEY, persistent)?;
        let password_salt = secret(&lookup, "AUTH_SALT", DEV_PASSWORD_SALT, persistent)?;

        Ok(Self {
            port,
            database_url,
            auth: AuthConfig::new(signing_key, password_salt, Duration::hours(ttl_hours)),
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// Development fallbacks are only allowed for in-memory runs
fn secret(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    dev_value: &str,
    required: bool,
) -> Result<String, ConfigError> {
    match lookup(key).filter(|value| !value.is_empty()) {
        Some(value) => Ok(value),
        None if required => Err(ConfigError::Missing { key }),
        None => {
            warn!("{} not set, using development value for in-memory storage", key);
            Ok(dev_value.to_string())
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}
