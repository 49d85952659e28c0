// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::{PgPool, types::Json};

use crate::{
    error::AppError,
    models::{
        attempt::{AttemptRow, QuizAttemptRecord},
        course::Course,
    },
    store::{AttemptStore, CourseStore},
};

/// Postgres-backed store.
///
/// Attempts live in the append-only `quiz_attempts` table; courses are kept as
/// JSONB documents in `courses`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl AttemptStore for PgStore {
    async fn load_attempts(&self, course_id: &str) -> Result<Vec<QuizAttemptRecord>, AppError> {
        let rows = sqlx::query_as::<_, AttemptRow>(
            r#"
            SELECT
                course_id,
                quiz_index,
                quiz_name,
                score,
                total_questions,
                timestamp_ms,
                duration_seconds
            FROM quiz_attempts
            WHERE course_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load attempts for course {}: {:?}", course_id, e);
            AppError::from(e)
        })?;

        rows.into_iter().map(QuizAttemptRecord::try_from).collect()
    }

    async fn save_attempt(&self, record: &QuizAttemptRecord) -> Result<(), AppError> {
        record.validate()?;

        let quiz_index = i64::try_from(record.quiz_index)
            .map_err(|_| AppError::ValidationError("quiz index is too large".to_string()))?;
        let duration = record
            .duration_seconds
            .map(i64::try_from)
            .transpose()
            .map_err(|_| AppError::ValidationError("duration is too large".to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO quiz_attempts
                (course_id, quiz_index, quiz_name, score, total_questions, timestamp_ms, duration_seconds)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&record.course_id)
        .bind(quiz_index)
        .bind(&record.quiz_name)
        .bind(i64::from(record.score))
        .bind(i64::from(record.total_questions))
        .bind(record.timestamp)
        .bind(duration)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert attempt record: {:?}", e);
            AppError::from(e)
        })?;

        Ok(())
    }
}

#[async_trait]
impl CourseStore for PgStore {
    async fn load_course(&self, course_id: &str) -> Result<Option<Course>, AppError> {
        let course = sqlx::query_scalar::<_, Json<Course>>("SELECT content FROM courses WHERE id = $1")
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(course.map(|Json(course)| course))
    }

    async fn save_course(&self, course: &Course) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO courses (id, name, content)
            VALUES ($1, $2, $3)
            ON CONFLICT(id) DO UPDATE SET
                name = EXCLUDED.name,
                content = EXCLUDED.content,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(&course.id)
        .bind(&course.name)
        .bind(Json(course))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
