use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

use crate::auth::{service::DEFAULT_BANK_NUMBER_ATTEMPTS, TokenConfig, DEFAULT_EXPIRATION_HOURS};

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Process configuration, read once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: String,
    /// Postgres connection string; the in-memory store is used when unset
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub token: TokenConfig,
    pub bank_number_attempts: u32,
}

impl AppConfig {
    /// Reads configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let secret = value("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let expiration_hours = parse_or(
            "TOKEN_EXPIRATION_HOURS",
            value("TOKEN_EXPIRATION_HOURS"),
            DEFAULT_EXPIRATION_HOURS,
        )?;
        if expiration_hours <= 0 {
            return Err(ConfigError::Invalid {
                key: "TOKEN_EXPIRATION_HOURS",
                message: "must be positive".to_string(),
            });
        }

        Ok(Self {
            listen_addr: value("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
            database_url: value("DATABASE_URL"),
            database_max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                value("DATABASE_MAX_CONNECTIONS"),
                DEFAULT_MAX_CONNECTIONS,
            )?,
            token: TokenConfig::new(secret).with_expiration_hours(expiration_hours),
            bank_number_attempts: parse_or(
                "BANK_NUMBER_ATTEMPTS",
                value("BANK_NUMBER_ATTEMPTS"),
                DEFAULT_BANK_NUMBER_ATTEMPTS,
            )?,
        })
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            message: e.to_string(),
        }),
    }
}
