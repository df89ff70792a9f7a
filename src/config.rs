// Application settings loaded once at startup from the process environment

use chrono::Duration;
use jsonwebtoken::Algorithm;
use std::env;
use thiserror::Error;

/// Prefix every versioned route is mounted under
pub const API_V1_STR: &str = "/api/v1";

/// Signing algorithm for access tokens
pub const ALGORITHM: Algorithm = Algorithm::HS256;

/// Access token lifetime: 7 days
pub const ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 60 * 24 * 7;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Settings shared by the pool constructor, the token service and the server
#[derive(Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("database_url", &"[hidden]")
            .field("jwt_secret", &"[hidden]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl Settings {
    /// Build settings with defaults for everything except the two secrets
    pub fn new(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            jwt_secret: jwt_secret.into(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Read settings from the environment.
    ///
    /// `DATABASE_URL` and `JWT_SECRET` are required. `HOST`, `PORT` and
    /// `DATABASE_MAX_CONNECTIONS` fall back to defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = required(&lookup, "DATABASE_URL")?;
        let jwt_secret = required(&lookup, "JWT_SECRET")?;

        let mut settings = Self::new(database_url, jwt_secret);

        if let Some(host) = lookup("HOST") {
            settings.host = host;
        }
        if let Some(port) = lookup("PORT") {
            settings.port = parse(&port, "PORT")?;
        }
        if let Some(max) = lookup("DATABASE_MAX_CONNECTIONS") {
            settings.max_connections = parse(&max, "DATABASE_MAX_CONNECTIONS")?;
        }

        Ok(settings)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn access_token_lifetime(&self) -> Duration {
        Duration::minutes(ACCESS_TOKEN_EXPIRE_MINUTES)
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn parse<T: std::str::FromStr>(value: &str, name: &'static str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}
