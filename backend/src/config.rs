//! Runtime configuration read from the environment (and `.env` via dotenvy).

use std::path::PathBuf;

use axum::http::HeaderValue;
use thiserror::Error;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATABASE_URL: &str = "sqlite:pet_care.db";
const DEFAULT_TOKEN_TTL_DAYS: i64 = 30;
const DEFAULT_UPLOAD_DIR: &str = "uploads";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    pub upload_dir: PathBuf,
    /// `None` allows any origin
    pub cors_origin: Option<HeaderValue>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match value("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value: raw })?,
            None => DEFAULT_PORT,
        };

        let jwt_secret = value("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let token_ttl_days = match value("TOKEN_TTL_DAYS") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(days) if days > 0 => days,
                _ => return Err(ConfigError::Invalid { name: "TOKEN_TTL_DAYS", value: raw }),
            },
            None => DEFAULT_TOKEN_TTL_DAYS,
        };

        let cors_origin = match value("CORS_ORIGIN") {
            Some(raw) => Some(
                HeaderValue::from_str(&raw)
                    .map_err(|_| ConfigError::Invalid { name: "CORS_ORIGIN", value: raw })?,
            ),
            None => None,
        };

        Ok(Self {
            port,
            database_url: value("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret,
            token_ttl_days,
            upload_dir: value("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            cors_origin,
        })
    }
}
