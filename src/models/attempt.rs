// src/models/attempt.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

/// One completed pass through a quiz.
///
/// Created once at completion and never updated; stores only append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttemptRecord {
    pub course_id: String,
    pub quiz_index: usize,
    pub quiz_name: String,
    pub score: u32,
    pub total_questions: u32,
    /// Completion time as epoch milliseconds.
    pub timestamp: i64,
    #[serde(
        rename = "duration",
        alias = "durationSeconds",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_seconds: Option<u64>,
}

impl QuizAttemptRecord {
    /// Score as a percentage in `[0, 100]`; `0` when the quiz had no questions.
    pub fn percentage(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        self.score as f64 * 100.0 / self.total_questions as f64
    }

    /// Completion time, `None` if the stored timestamp is out of range.
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.course_id.trim().is_empty() {
            return Err(AppError::ValidationError(
                "attempt record has an empty courseId".to_string(),
            ));
        }
        if self.score > self.total_questions {
            return Err(AppError::ValidationError(format!(
                "attempt score {} exceeds total questions {}",
                self.score, self.total_questions
            )));
        }
        Ok(())
    }
}

/// Represents a row of the 'quiz_attempts' table.
#[derive(Debug, Clone, FromRow)]
pub struct AttemptRow {
    pub course_id: String,
    pub quiz_index: i64,
    pub quiz_name: String,
    pub score: i64,
    pub total_questions: i64,
    pub timestamp_ms: i64,
    pub duration_seconds: Option<i64>,
}

impl TryFrom<AttemptRow> for QuizAttemptRecord {
    type Error = AppError;

    fn try_from(row: AttemptRow) -> Result<Self, Self::Error> {
        let out_of_range =
            |field: &str| AppError::StoreError(format!("stored {} is out of range", field));

        let record = QuizAttemptRecord {
            course_id: row.course_id,
            quiz_index: usize::try_from(row.quiz_index).map_err(|_| out_of_range("quiz_index"))?,
            quiz_name: row.quiz_name,
            score: u32::try_from(row.score).map_err(|_| out_of_range("score"))?,
            total_questions: u32::try_from(row.total_questions)
                .map_err(|_| out_of_range("total_questions"))?,
            timestamp: row.timestamp_ms,
            duration_seconds: row
                .duration_seconds
                .map(u64::try_from)
                .transpose()
                .map_err(|_| out_of_range("duration_seconds"))?,
        };
        Ok(record)
    }
}
