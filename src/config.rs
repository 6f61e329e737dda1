use std::env;
use std::str::FromStr;

use actix_web::http::Uri;
use dotenvy::dotenv;
use strum_macros::{AsRefStr, EnumString};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid value {value:?} for {key}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StorageBackend {
    Mysql,
    Memory,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub storage_backend: StorageBackend,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,

    // Rate limiting
    pub rate_api_per_min: u32,

    pub api_prefix: String,
    /// Origin allowed to call the API from a browser; `*` for any.
    pub cors_origin: String,

    pub log_dir: String,
    pub log_level: tracing::Level,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        Ok(Self {
            server_addr: var_or("SERVER_ADDR", "0.0.0.0:3001"),
            storage_backend: parse_var("STORAGE_BACKEND", "mysql")?,
            database_url: var_or("DATABASE_URL", "mysql://root@localhost:3306/hrms_lite"),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", "10")?,
            db_acquire_timeout_secs: parse_var("DB_ACQUIRE_TIMEOUT_SECS", "5")?,

            rate_api_per_min: parse_var("RATE_API_PER_MIN", "1000")?,

            api_prefix: var_or("API_PREFIX", "/api"),
            cors_origin: origin_var("CORS_ORIGIN", "*")?,

            log_dir: var_or("LOG_DIR", "logs"),
            log_level: parse_var("LOG_LEVEL", "debug")?,
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError> {
    let value = var_or(key, default);
    value.trim().parse().map_err(|_| ConfigError { key, value })
}

/// `*` or an absolute origin such as `https://hr.example.com`.
fn origin_var(key: &'static str, default: &str) -> Result<String, ConfigError> {
    let value = var_or(key, default).trim().to_string();
    let valid = value == "*"
        || value
            .parse::<Uri>()
            .is_ok_and(|uri| uri.scheme().is_some() && uri.host().is_some());

    if valid {
        Ok(value)
    } else {
        Err(ConfigError { key, value })
    }
}
