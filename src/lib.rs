// src/lib.rs

pub mod analytics;
pub mod config;
pub mod error;
pub mod models;
pub mod quiz;
pub mod services;
pub mod store;

// Re-export specific items for convenience
pub use analytics::{AnalyticsReport, ResultAggregator};
pub use error::AppError;
pub use quiz::{Advance, QuizSession};
