// src/models/question.rs

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;

/// A single quiz question.
///
/// Only constructible through [`Question::new`] or deserialization, both of which
/// run the same validation, so a `Question` value is always well-formed.
/// Fields are private: shuffling produces a new `Question` instead of mutating one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionInput", rename_all = "camelCase")]
pub struct Question {
    id: i64,

    /// The text content of the question.
    text: String,

    /// Option texts in display order.
    options: Vec<String>,

    /// Positions in `options` that are correct.
    answer_indices: BTreeSet<usize>,

    /// Explanation shown after the answer is revealed.
    #[serde(skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,
}

/// DTO for an incoming question payload.
///
/// Accepts the legacy single `answerIndex` field alongside `answerIndices`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    pub id: i64,
    pub text: String,
    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,
    #[serde(default)]
    pub answer_indices: Option<Vec<usize>>,
    /// Legacy single-answer field, normalized into `answer_indices`.
    #[serde(default)]
    pub answer_index: Option<usize>,
    pub explanation: Option<String>,
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    if options.len() < 2 {
        return Err(validator::ValidationError::new("options_need_at_least_two"));
    }
    Ok(())
}

impl TryFrom<QuestionInput> for Question {
    type Error = AppError;

    fn try_from(input: QuestionInput) -> Result<Self, Self::Error> {
        input.validate()?;

        let answer_indices: BTreeSet<usize> = match (input.answer_indices, input.answer_index) {
            (Some(indices), _) => indices.into_iter().collect(),
            (None, Some(index)) => BTreeSet::from([index]),
            (None, None) => {
                return Err(AppError::ValidationError(format!(
                    "question {} has no answerIndices",
                    input.id
                )));
            }
        };

        if answer_indices.is_empty() {
            return Err(AppError::ValidationError(format!(
                "question {} has empty answerIndices",
                input.id
            )));
        }

        if let Some(bad) = answer_indices.iter().find(|&&i| i >= input.options.len()) {
            return Err(AppError::ValidationError(format!(
                "question {} answer index {} is out of range for {} options",
                input.id,
                bad,
                input.options.len()
            )));
        }

        Ok(Question {
            id: input.id,
            text: input.text,
            options: input.options,
            answer_indices,
            explanation: input.explanation,
        })
    }
}

impl Question {
    pub fn new(
        id: i64,
        text: impl Into<String>,
        options: Vec<String>,
        answer_indices: impl IntoIterator<Item = usize>,
        explanation: Option<String>,
    ) -> Result<Self, AppError> {
        Question::try_from(QuestionInput {
            id,
            text: text.into(),
            options,
            answer_indices: Some(answer_indices.into_iter().collect()),
            answer_index: None,
            explanation,
        })
    }

    /// Parses a question from its JSON interchange form.
    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String, AppError> {
        serde_json::to_string(self)
            .map_err(|e| AppError::ValidationError(format!("failed to serialize question: {}", e)))
    }

    /// Builds a copy with a re-ordered option list.
    /// Callers guarantee `answer_indices` is non-empty and in range for `options`.
    pub(crate) fn with_options(&self, options: Vec<String>, answer_indices: BTreeSet<usize>) -> Self {
        debug_assert_eq!(options.len(), self.options.len());
        debug_assert!(!answer_indices.is_empty());
        Question {
            id: self.id,
            text: self.text.clone(),
            options,
            answer_indices,
            explanation: self.explanation.clone(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn answer_indices(&self) -> &BTreeSet<usize> {
        &self.answer_indices
    }

    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    pub fn is_multi_select(&self) -> bool {
        self.answer_indices.len() > 1
    }

    /// Texts of the correct options, in index order.
    pub fn correct_texts(&self) -> Vec<&str> {
        self.answer_indices
            .iter()
            .map(|&i| self.options[i].as_str())
            .collect()
    }
}
