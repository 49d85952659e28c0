// src/config.rs

use std::env;
use std::str::FromStr;

use dotenvy::dotenv;

use crate::error::AppError;

/// Number of attempts shown in the "recent activity" list when not configured.
pub const DEFAULT_RECENT_ACTIVITY_LIMIT: usize = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub log_dir: String,
    pub db_max_connections: u32,
    pub recent_activity_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| AppError::ConfigError("DATABASE_URL must be set".to_string()))?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

        let db_max_connections = parse_or("DB_MAX_CONNECTIONS", 5)?;

        let recent_activity_limit =
            parse_or("RECENT_ACTIVITY_LIMIT", DEFAULT_RECENT_ACTIVITY_LIMIT)?;

        Ok(Self {
            database_url,
            rust_log,
            log_dir,
            db_max_connections,
            recent_activity_limit,
        })
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::ConfigError(format!("{} has an invalid value: {}", key, raw))),
        Err(_) => Ok(default),
    }
}
