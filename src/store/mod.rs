// src/store/mod.rs

//! Persistence boundary.
//!
//! The engine only needs to read a course, read its attempt history and append
//! one attempt. Implementations do not retry; failures come back as
//! `AppError::StoreError`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{attempt::QuizAttemptRecord, course::Course},
};

pub use memory::InMemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait AttemptStore: Send + Sync {
    /// All attempts recorded for `course_id`, in insertion order.
    async fn load_attempts(&self, course_id: &str) -> Result<Vec<QuizAttemptRecord>, AppError>;

    /// Appends one attempt. Records are never updated or deleted.
    async fn save_attempt(&self, record: &QuizAttemptRecord) -> Result<(), AppError>;
}

#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn load_course(&self, course_id: &str) -> Result<Option<Course>, AppError>;

    /// Inserts or replaces the course document.
    async fn save_course(&self, course: &Course) -> Result<(), AppError>;
}
