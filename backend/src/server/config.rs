//! Environment-driven server configuration.
//!
//! | Variable                  | Meaning                                  | Default          |
//! |---------------------------|------------------------------------------|------------------|
//! | `BIND_ADDR`               | Listen address                           | `0.0.0.0:8080`   |
//! | `DATABASE_URL`            | PostgreSQL connection string             | required         |
//! | `PLACES_API_URL`          | Base URL of the places service           | required         |
//! | `PLACES_API_KEY`          | API key for the places service           | required         |
//! | `SESSION_KEY_FILE`        | File holding the cookie signing secret   | see below        |
//! | `SESSION_COOKIE_SECURE`   | Send session cookies over HTTPS only     | `true`           |
//! | `SESSION_ALLOW_EPHEMERAL` | Generate a throwaway key when no file    | `false`          |
//!
//! With `SESSION_ALLOW_EPHEMERAL=1` a missing key file falls back to a
//! generated key; sessions then die with the process, which is only
//! acceptable in development.

use std::env;
use std::path::PathBuf;

use actix_web::cookie::Key;
use thiserror::Error as ThisError;
use tracing::warn;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid {
        name: &'static str,
        reason: String,
    },
    #[error("failed to read session key file {path}: {source}")]
    SessionKeyFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub struct ServerConfig {
    pub bind_addr: String,
    pub database_url: String,
    pub places_api_url: Url,
    pub places_api_key: String,
    pub session_key: Key,
    pub cookie_secure: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let places_api_url = required("PLACES_API_URL")?;
        let places_api_url =
            Url::parse(&places_api_url).map_err(|error| ConfigError::Invalid {
                name: "PLACES_API_URL",
                reason: error.to_string(),
            })?;
        Ok(Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned()),
            database_url: required("DATABASE_URL")?,
            places_api_url,
            places_api_key: required("PLACES_API_KEY")?,
            session_key: session_key()?,
            cookie_secure: flag("SESSION_COOKIE_SECURE", true),
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

fn flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => !matches!(value.trim(), "0" | "false" | "no" | "off"),
        Err(_) => default,
    }
}

fn session_key() -> Result<Key, ConfigError> {
    if let Ok(path) = env::var("SESSION_KEY_FILE") {
        let path = PathBuf::from(path);
        let secret = std::fs::read(&path)
            .map_err(|source| ConfigError::SessionKeyFile {
                path: path.clone(),
                source,
            })?;
        if secret.len() < 64 {
            return Err(ConfigError::Invalid {
                name: "SESSION_KEY_FILE",
                reason: "secret must be at least 64 bytes".to_owned(),
            });
        }
        return Ok(Key::derive_from(&secret));
    }
    if flag("SESSION_ALLOW_EPHEMERAL", false) {
        warn!("no SESSION_KEY_FILE set, using an ephemeral session key");
        return Ok(Key::generate());
    }
    Err(ConfigError::MissingVar("SESSION_KEY_FILE"))
}
