// src/error.rs

use std::fmt;

/// Global Application Error Enum.
/// Every fallible operation in the crate returns this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    // Malformed question, course or attempt input
    ValidationError(String),

    // Session transition not allowed from the current phase
    StateError(String),

    // Persistence backend failure
    StoreError(String),

    // Unknown course id or quiz index
    NotFound(String),

    // Missing or unparsable environment configuration
    ConfigError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "validation error: {}", msg),
            AppError::StateError(msg) => write!(f, "invalid state transition: {}", msg),
            AppError::StoreError(msg) => write!(f, "store error: {}", msg),
            AppError::NotFound(msg) => write!(f, "not found: {}", msg),
            AppError::ConfigError(msg) => write!(f, "configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `sqlx::Error` into `AppError::StoreError`.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::StoreError(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::StoreError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}
