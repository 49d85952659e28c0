// src/quiz/session.rs

//! The quiz-taking state machine.
//!
//! A session moves through `AwaitingSelection(i) -> Revealed(i) -> ...` until
//! the last question is revealed and advanced past, which yields `Completed`.
//! Each operation returns an explicit snapshot of the new state; a rejected
//! operation returns `AppError::StateError` and leaves the session untouched.

use std::collections::BTreeSet;

use rand::Rng;
use serde::Serialize;

use crate::{
    error::AppError,
    models::{attempt::QuizAttemptRecord, course::SortingPreference, question::Question},
    quiz::{scoring, shuffle},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum Phase {
    AwaitingSelection { index: usize },
    Revealed { index: usize },
    Completed,
}

/// A question answered incorrectly, with the selection that was revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissedQuestion {
    pub index: usize,
    pub question: Question,
    pub selection: BTreeSet<usize>,
}

/// Snapshot of the session after an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub phase: Phase,
    pub index: usize,
    pub total: usize,
    pub question: Question,
    pub selection: BTreeSet<usize>,
    pub revealed: bool,
    /// `Some(correct)` once the current question has been revealed.
    pub outcome: Option<bool>,
    pub score: u32,
}

/// Terminal result of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub score: u32,
    pub total: u32,
    pub missed: Vec<MissedQuestion>,
}

impl QuizSummary {
    /// Turns the summary into the record persisted for this attempt.
    pub fn to_record(
        &self,
        course_id: impl Into<String>,
        quiz_index: usize,
        quiz_name: impl Into<String>,
        timestamp_ms: i64,
        duration_seconds: Option<u64>,
    ) -> QuizAttemptRecord {
        QuizAttemptRecord {
            course_id: course_id.into(),
            quiz_index,
            quiz_name: quiz_name.into(),
            score: self.score,
            total_questions: self.total,
            timestamp: timestamp_ms,
            duration_seconds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Next(SessionView),
    Completed(QuizSummary),
}

#[derive(Debug, Clone, Default)]
struct AnswerState {
    selection: BTreeSet<usize>,
    outcome: Option<bool>,
}

/// Single-owner quiz session over one question list.
#[derive(Debug, Clone)]
pub struct QuizSession {
    original: Vec<Question>,
    questions: Vec<Question>,
    answers: Vec<AnswerState>,
    total: u32,
    current: usize,
    completed: bool,
    score: u32,
    missed: Vec<MissedQuestion>,
}

impl QuizSession {
    /// Starts a session over `questions` in the given order.
    pub fn new(questions: Vec<Question>) -> Result<Self, AppError> {
        let working = questions.clone();
        Self::with_working_copy(questions, working)
    }

    /// Starts a session, shuffling first when `preference` is `Random`.
    pub fn start<R: Rng + ?Sized>(
        questions: Vec<Question>,
        preference: SortingPreference,
        rng: &mut R,
    ) -> Result<Self, AppError> {
        let working = shuffle::prepare_session(&questions, preference, rng);
        Self::with_working_copy(questions, working)
    }

    fn with_working_copy(original: Vec<Question>, working: Vec<Question>) -> Result<Self, AppError> {
        if original.is_empty() {
            return Err(AppError::ValidationError(
                "cannot start a quiz with no questions".to_string(),
            ));
        }
        let total = question_count(working.len())?;
        let answers = vec![AnswerState::default(); working.len()];
        Ok(QuizSession {
            original,
            questions: working,
            answers,
            total,
            current: 0,
            completed: false,
            score: 0,
            missed: Vec::new(),
        })
    }

    pub fn phase(&self) -> Phase {
        if self.completed {
            Phase::Completed
        } else if self.answers[self.current].outcome.is_some() {
            Phase::Revealed {
                index: self.current,
            }
        } else {
            Phase::AwaitingSelection {
                index: self.current,
            }
        }
    }

    pub fn view(&self) -> SessionView {
        let answer = &self.answers[self.current];
        SessionView {
            phase: self.phase(),
            index: self.current,
            total: self.questions.len(),
            question: self.questions[self.current].clone(),
            selection: answer.selection.clone(),
            revealed: answer.outcome.is_some(),
            outcome: answer.outcome,
            score: self.score,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn missed(&self) -> &[MissedQuestion] {
        &self.missed
    }

    /// The working (possibly shuffled) question list.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Selects or deselects an option of the current question.
    ///
    /// Single-answer questions replace the selection instead of toggling.
    pub fn toggle_option(&mut self, option: usize) -> Result<SessionView, AppError> {
        let index = match self.phase() {
            Phase::AwaitingSelection { index } => index,
            other => {
                return Err(AppError::StateError(format!(
                    "cannot change the selection in phase {:?}",
                    other
                )));
            }
        };

        let question = &self.questions[index];
        if option >= question.options().len() {
            return Err(AppError::ValidationError(format!(
                "option {} is out of range for question {}",
                option,
                question.id()
            )));
        }

        let multi = question.is_multi_select();
        let selection = &mut self.answers[index].selection;
        if multi {
            if !selection.remove(&option) {
                selection.insert(option);
            }
        } else {
            selection.clear();
            selection.insert(option);
        }

        Ok(self.view())
    }

    /// Scores the current selection. Calling it again on a revealed question is a no-op.
    pub fn reveal(&mut self) -> Result<SessionView, AppError> {
        let index = match self.phase() {
            Phase::AwaitingSelection { index } => index,
            Phase::Revealed { .. } => return Ok(self.view()),
            Phase::Completed => {
                return Err(AppError::StateError(
                    "cannot reveal after the quiz is completed".to_string(),
                ));
            }
        };

        let question = &self.questions[index];
        let answer = &mut self.answers[index];
        let correct = scoring::evaluate(&answer.selection, question.answer_indices());
        answer.outcome = Some(correct);

        if correct {
            self.score += 1;
        } else {
            self.missed.push(MissedQuestion {
                index,
                question: question.clone(),
                selection: answer.selection.clone(),
            });
        }

        tracing::debug!(index, correct, score = self.score, "question revealed");
        Ok(self.view())
    }

    /// Moves to the next question, or completes the quiz after the last one.
    pub fn advance(&mut self) -> Result<Advance, AppError> {
        let index = match self.phase() {
            Phase::Revealed { index } => index,
            other => {
                return Err(AppError::StateError(format!(
                    "cannot advance in phase {:?}",
                    other
                )));
            }
        };

        if index + 1 == self.questions.len() {
            self.completed = true;
            let summary = self.summary();
            tracing::debug!(score = summary.score, total = summary.total, "quiz completed");
            return Ok(Advance::Completed(summary));
        }

        self.current = index + 1;
        Ok(Advance::Next(self.view()))
    }

    /// Steps back to the previous question as a read-only view.
    pub fn retreat(&mut self) -> Result<SessionView, AppError> {
        if self.completed {
            return Err(AppError::StateError(
                "cannot go back after the quiz is completed".to_string(),
            ));
        }
        if self.current == 0 {
            return Err(AppError::StateError(
                "already at the first question".to_string(),
            ));
        }
        self.current -= 1;
        Ok(self.view())
    }

    /// Restarts over the original, unshuffled question list.
    pub fn reset(&mut self) -> SessionView {
        self.questions = self.original.clone();
        self.answers = vec![AnswerState::default(); self.questions.len()];
        self.current = 0;
        self.completed = false;
        self.score = 0;
        self.missed.clear();
        tracing::debug!("session reset");
        self.view()
    }

    fn summary(&self) -> QuizSummary {
        QuizSummary {
            score: self.score,
            total: self.total,
            missed: self.missed.clone(),
        }
    }
}

fn question_count(len: usize) -> Result<u32, AppError> {
    u32::try_from(len).map_err(|_| {
        AppError::ValidationError(format!("quiz has too many questions: {}", len))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn question(id: i64, options: &[&str], answers: &[usize]) -> Question {
        Question::new(
            id,
            format!("question {}", id),
            options.iter().map(|s| s.to_string()).collect(),
            answers.iter().copied(),
            None,
        )
        .unwrap()
    }

    fn three_questions() -> Vec<Question> {
        vec![
            question(1, &["3", "4", "5"], &[1]),
            question(2, &["2", "4", "5", "9"], &[0, 2]),
            question(3, &["red", "blue"], &[1]),
        ]
    }

    #[test]
    fn test_single_select_correct() {
        let mut session = QuizSession::new(vec![question(1, &["3", "4", "5"], &[1])]).unwrap();
        session.toggle_option(1).unwrap();
        let view = session.reveal().unwrap();
        assert_eq!(view.outcome, Some(true));
        assert_eq!(session.score(), 1);
        assert!(session.missed().is_empty());
    }

    #[test]
    fn test_multi_select_partial_is_missed() {
        let mut session =
            QuizSession::new(vec![question(1, &["2", "4", "5", "9"], &[0, 2])]).unwrap();
        session.toggle_option(0).unwrap();
        let view = session.reveal().unwrap();
        assert_eq!(view.outcome, Some(false));
        assert_eq!(session.score(), 0);
        assert_eq!(session.missed().len(), 1);
        assert_eq!(session.missed()[0].selection, BTreeSet::from([0]));
    }

    #[test]
    fn test_single_select_replaces_selection() {
        let mut session = QuizSession::new(three_questions()).unwrap();
        session.toggle_option(0).unwrap();
        let view = session.toggle_option(2).unwrap();
        assert_eq!(view.selection, BTreeSet::from([2]));
    }

    #[test]
    fn test_multi_select_toggles() {
        let mut session = QuizSession::new(vec![question(1, &["a", "b", "c"], &[0, 1])]).unwrap();
        session.toggle_option(0).unwrap();
        session.toggle_option(1).unwrap();
        let view = session.toggle_option(0).unwrap();
        assert_eq!(view.selection, BTreeSet::from([1]));
    }

    #[test]
    fn test_toggle_out_of_range_is_rejected() {
        let mut session = QuizSession::new(three_questions()).unwrap();
        let err = session.toggle_option(3).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(session.view().selection.is_empty());
    }

    #[test]
    fn test_reveal_is_idempotent() {
        let mut session = QuizSession::new(three_questions()).unwrap();
        session.toggle_option(0).unwrap();
        session.reveal().unwrap();
        session.reveal().unwrap();
        assert_eq!(session.missed().len(), 1);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_invalid_transitions_do_not_mutate() {
        let mut session = QuizSession::new(three_questions()).unwrap();

        assert!(matches!(session.advance(), Err(AppError::StateError(_))));
        assert!(matches!(session.retreat(), Err(AppError::StateError(_))));

        session.toggle_option(1).unwrap();
        session.reveal().unwrap();
        let before = session.view();
        assert!(matches!(session.toggle_option(0), Err(AppError::StateError(_))));
        assert_eq!(session.view(), before);
    }

    #[test]
    fn test_full_run_completes_with_summary() {
        let mut session = QuizSession::new(three_questions()).unwrap();

        session.toggle_option(1).unwrap();
        session.reveal().unwrap();
        assert!(matches!(session.advance().unwrap(), Advance::Next(_)));

        session.toggle_option(0).unwrap();
        session.reveal().unwrap();
        session.advance().unwrap();

        session.toggle_option(1).unwrap();
        session.reveal().unwrap();
        let summary = match session.advance().unwrap() {
            Advance::Completed(summary) => summary,
            other => panic!("expected completion, got {:?}", other),
        };

        assert_eq!(summary.score, 2);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.missed.len(), 1);
        assert_eq!(summary.missed[0].index, 1);
        assert_eq!(session.phase(), Phase::Completed);

        assert!(matches!(session.reveal(), Err(AppError::StateError(_))));
        assert!(matches!(session.retreat(), Err(AppError::StateError(_))));
        assert!(matches!(session.advance(), Err(AppError::StateError(_))));
    }

    #[test]
    fn test_retreat_is_read_only() {
        let mut session = QuizSession::new(three_questions()).unwrap();
        session.toggle_option(2).unwrap();
        session.reveal().unwrap();
        session.advance().unwrap();

        let score = session.score();
        let missed = session.missed().to_vec();

        let view = session.retreat().unwrap();
        assert_eq!(view.phase, Phase::Revealed { index: 0 });
        assert_eq!(view.selection, BTreeSet::from([2]));
        assert_eq!(view.outcome, Some(false));

        session.reveal().unwrap();
        assert!(matches!(session.toggle_option(1), Err(AppError::StateError(_))));

        let next = session.advance().unwrap();
        match next {
            Advance::Next(view) => {
                assert_eq!(view.phase, Phase::AwaitingSelection { index: 1 });
                assert!(view.selection.is_empty());
            }
            other => panic!("expected next question, got {:?}", other),
        }
        assert_eq!(session.score(), score);
        assert_eq!(session.missed(), missed.as_slice());
    }

    #[test]
    fn test_score_and_missed_never_exceed_position() {
        let mut session = QuizSession::new(three_questions()).unwrap();
        for step in 0..3 {
            session.toggle_option(0).unwrap();
            session.reveal().unwrap();
            let answered = session.score() as usize + session.missed().len();
            assert!(answered <= session.view().index + 1);
            if step < 2 {
                session.advance().unwrap();
                session.retreat().unwrap();
                session.advance().unwrap();
            }
        }
        let indices: BTreeSet<usize> = session.missed().iter().map(|m| m.index).collect();
        assert_eq!(indices.len(), session.missed().len());
    }

    #[test]
    fn test_reset_restores_original_order() {
        let questions: Vec<Question> = (0..6)
            .map(|i| question(i, &["a", "b", "c", "d"], &[0]))
            .collect();
        let mut rng = StdRng::seed_from_u64(5);
        let mut session =
            QuizSession::start(questions.clone(), SortingPreference::Random, &mut rng).unwrap();

        session.toggle_option(0).unwrap();
        session.reveal().unwrap();

        let view = session.reset();
        assert_eq!(view.phase, Phase::AwaitingSelection { index: 0 });
        assert_eq!(session.score(), 0);
        assert!(session.missed().is_empty());
        assert_eq!(session.questions(), questions.as_slice());
    }

    #[test]
    fn test_empty_question_list_is_rejected() {
        assert!(matches!(
            QuizSession::new(Vec::new()),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_question_count_is_checked() {
        assert_eq!(question_count(3).unwrap(), 3);
        assert_eq!(question_count(u32::MAX as usize).unwrap(), u32::MAX);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_question_count_overflow_is_rejected() {
        let err = question_count(u32::MAX as usize + 1).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn test_summary_to_record() {
        let summary = QuizSummary {
            score: 3,
            total: 4,
            missed: Vec::new(),
        };
        let record = summary.to_record("c1", 2, "Quiz 3", 1_000, Some(30));
        assert_eq!(record.quiz_index, 2);
        assert_eq!(record.percentage(), 75.0);
        assert_eq!(record.duration_seconds, Some(30));
    }
}
