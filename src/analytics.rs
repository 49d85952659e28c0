// src/analytics.rs

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::{
    config::DEFAULT_RECENT_ACTIVITY_LIMIT,
    models::{attempt::QuizAttemptRecord, course::default_quiz_name},
};

/// Average percentage for one quiz.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAverage {
    pub quiz_index: usize,
    pub name: String,
    pub average: f64,
}

/// Everything the analytics view shows, in one serializable value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub course_id: String,
    pub average_score: Option<f64>,
    pub total_attempts: usize,
    pub best_performing_quiz: Option<QuizAverage>,
    pub chart_series: Vec<QuizAverage>,
    pub recent_activity: Vec<QuizAttemptRecord>,
}

/// Pure reductions over one course's attempt history.
///
/// Operates on a snapshot; fetching fresh data means building a new aggregator.
#[derive(Debug, Clone)]
pub struct ResultAggregator {
    attempts: Vec<QuizAttemptRecord>,
    quiz_names: HashMap<usize, String>,
}

impl ResultAggregator {
    pub fn new(attempts: Vec<QuizAttemptRecord>, quiz_names: HashMap<usize, String>) -> Self {
        ResultAggregator {
            attempts,
            quiz_names,
        }
    }

    pub fn attempts(&self) -> &[QuizAttemptRecord] {
        &self.attempts
    }

    /// Mean percentage over all attempts, `None` when there are none.
    pub fn average_score(&self) -> Option<f64> {
        if self.attempts.is_empty() {
            return None;
        }
        let sum: f64 = self.attempts.iter().map(QuizAttemptRecord::percentage).sum();
        Some(sum / self.attempts.len() as f64)
    }

    pub fn total_attempts(&self) -> usize {
        self.attempts.len()
    }

    /// Quiz with the highest mean percentage. Ties go to the lowest quiz index.
    pub fn best_performing_quiz(&self) -> Option<QuizAverage> {
        self.chart_series()
            .into_iter()
            .fold(None, |best: Option<QuizAverage>, candidate| match best {
                Some(current) if current.average >= candidate.average => Some(current),
                _ => Some(candidate),
            })
    }

    /// One point per attempted quiz, ascending by quiz index.
    pub fn chart_series(&self) -> Vec<QuizAverage> {
        let mut groups: BTreeMap<usize, (f64, usize)> = BTreeMap::new();
        for attempt in &self.attempts {
            let entry = groups.entry(attempt.quiz_index).or_insert((0.0, 0));
            entry.0 += attempt.percentage();
            entry.1 += 1;
        }

        groups
            .into_iter()
            .map(|(quiz_index, (sum, count))| QuizAverage {
                quiz_index,
                name: self.name_for(quiz_index),
                average: sum / count as f64,
            })
            .collect()
    }

    /// Most recent attempts first, at most `limit` of them.
    pub fn recent_activity(&self, limit: usize) -> Vec<QuizAttemptRecord> {
        let mut sorted = self.attempts.clone();
        sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        sorted.truncate(limit);
        sorted
    }

    pub fn report(&self, course_id: impl Into<String>, recent_limit: usize) -> AnalyticsReport {
        AnalyticsReport {
            course_id: course_id.into(),
            average_score: self.average_score(),
            total_attempts: self.total_attempts(),
            best_performing_quiz: self.best_performing_quiz(),
            chart_series: self.chart_series(),
            recent_activity: self.recent_activity(recent_limit),
        }
    }

    pub fn default_report(&self, course_id: impl Into<String>) -> AnalyticsReport {
        self.report(course_id, DEFAULT_RECENT_ACTIVITY_LIMIT)
    }

    // Course mapping first, then the name stored on the attempt itself.
    fn name_for(&self, quiz_index: usize) -> String {
        if let Some(name) = self.quiz_names.get(&quiz_index) {
            return name.clone();
        }
        self.attempts
            .iter()
            .rev()
            .find(|a| a.quiz_index == quiz_index && !a.quiz_name.is_empty())
            .map(|a| a.quiz_name.clone())
            .unwrap_or_else(|| default_quiz_name(quiz_index))
    }
}
