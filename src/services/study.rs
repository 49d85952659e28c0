// src/services/study.rs

use rand::Rng;

use crate::{
    analytics::ResultAggregator,
    error::AppError,
    models::{attempt::QuizAttemptRecord, course::Course},
    quiz::session::{QuizSession, QuizSummary},
    store::{AttemptStore, CourseStore},
};

/// Loads a course and opens a session on one of its quizzes.
///
/// * Honors the course's sorting preference.
/// * Returns the course alongside the session so the caller can record the attempt later.
pub async fn start_quiz<R: Rng + ?Sized>(
    courses: &dyn CourseStore,
    course_id: &str,
    quiz_index: usize,
    rng: &mut R,
) -> Result<(Course, QuizSession), AppError> {
    let course = courses
        .load_course(course_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("course {} not found", course_id)))?;

    let questions = course
        .quiz(quiz_index)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "course {} has no quiz at index {}",
                course_id, quiz_index
            ))
        })?
        .to_vec();

    let session = QuizSession::start(questions, course.quiz_sorting_preference, rng)?;

    tracing::info!(
        course_id,
        quiz_index,
        preference = ?course.quiz_sorting_preference,
        "Quiz session started"
    );

    Ok((course, session))
}

/// Builds the attempt record for a finished session and saves it exactly once.
///
/// A failed save is returned to the caller; the summary itself is unaffected.
pub async fn record_attempt(
    attempts: &dyn AttemptStore,
    course: &Course,
    quiz_index: usize,
    summary: &QuizSummary,
    started_at_ms: i64,
    finished_at_ms: i64,
) -> Result<QuizAttemptRecord, AppError> {
    let duration_seconds = u64::try_from(finished_at_ms.saturating_sub(started_at_ms))
        .ok()
        .map(|ms| ms / 1000);

    let record = summary.to_record(
        course.id.clone(),
        quiz_index,
        course.quiz_name(quiz_index),
        finished_at_ms,
        duration_seconds,
    );

    match attempts.save_attempt(&record).await {
        Ok(()) => {
            tracing::info!(
                course_id = %record.course_id,
                quiz_index,
                score = record.score,
                total = record.total_questions,
                "Quiz attempt recorded"
            );
            Ok(record)
        }
        Err(e) => {
            tracing::warn!("Failed to record quiz attempt for {}: {}", course.id, e);
            Err(e)
        }
    }
}

/// Current time as epoch milliseconds, for `record_attempt`.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Loads the course's attempt history once and wraps it for aggregation.
pub async fn load_analytics(
    attempts: &dyn AttemptStore,
    course: &Course,
) -> Result<ResultAggregator, AppError> {
    let history = attempts.load_attempts(&course.id).await?;
    tracing::info!(course_id = %course.id, attempts = history.len(), "Analytics loaded");
    Ok(ResultAggregator::new(history, course.quiz_names()))
}
