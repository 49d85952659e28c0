// src/store/memory.rs

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    error::AppError,
    models::{attempt::QuizAttemptRecord, course::Course},
    store::{AttemptStore, CourseStore},
};

/// In-process store backed by locked collections.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    attempts: RwLock<Vec<QuizAttemptRecord>>,
    courses: RwLock<HashMap<String, Course>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttemptStore for InMemoryStore {
    async fn load_attempts(&self, course_id: &str) -> Result<Vec<QuizAttemptRecord>, AppError> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .iter()
            .filter(|a| a.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn save_attempt(&self, record: &QuizAttemptRecord) -> Result<(), AppError> {
        record.validate()?;
        self.attempts.write().await.push(record.clone());
        Ok(())
    }
}

#[async_trait]
impl CourseStore for InMemoryStore {
    async fn load_course(&self, course_id: &str) -> Result<Option<Course>, AppError> {
        Ok(self.courses.read().await.get(course_id).cloned())
    }

    async fn save_course(&self, course: &Course) -> Result<(), AppError> {
        self.courses
            .write()
            .await
            .insert(course.id.clone(), course.clone());
        Ok(())
    }
}
