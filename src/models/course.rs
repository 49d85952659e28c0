// src/models/course.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::question::Question;

/// How a course's quizzes are ordered when a session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortingPreference {
    #[default]
    Sequential,
    Random,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardSet {
    pub name: String,
    #[serde(default)]
    pub cards: Vec<Flashcard>,
}

/// A course document: quizzes, flashcards and attached PDF references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub name: String,

    /// Each entry is one quiz (an ordered question list).
    #[serde(default)]
    pub quizzes: Vec<Vec<Question>>,

    /// Optional display names, parallel to `quizzes`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quiz_names: Vec<String>,

    #[serde(default)]
    pub pdfs: Vec<String>,

    #[serde(default)]
    pub flashcard_sets: Vec<FlashcardSet>,

    #[serde(default)]
    pub quiz_sorting_preference: SortingPreference,
}

impl Course {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Course {
            id: id.into(),
            name: name.into(),
            quizzes: Vec::new(),
            quiz_names: Vec::new(),
            pdfs: Vec::new(),
            flashcard_sets: Vec::new(),
            quiz_sorting_preference: SortingPreference::default(),
        }
    }

    pub fn quiz(&self, index: usize) -> Option<&[Question]> {
        self.quizzes.get(index).map(Vec::as_slice)
    }

    /// Custom name when one is set, otherwise "Quiz N" (1-based).
    pub fn quiz_name(&self, index: usize) -> String {
        match self.quiz_names.get(index) {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => default_quiz_name(index),
        }
    }

    /// `quizIndex -> name` mapping for every quiz in the course.
    pub fn quiz_names(&self) -> HashMap<usize, String> {
        (0..self.quizzes.len())
            .map(|i| (i, self.quiz_name(i)))
            .collect()
    }
}

pub fn default_quiz_name(index: usize) -> String {
    format!("Quiz {}", index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorting_preference_wire_format() {
        assert_eq!(
            serde_json::to_string(&SortingPreference::Random).unwrap(),
            "\"random\""
        );
        let pref: SortingPreference = serde_json::from_str("\"sequential\"").unwrap();
        assert_eq!(pref, SortingPreference::Sequential);
        assert!(serde_json::from_str::<SortingPreference>("\"alphabetical\"").is_err());
    }

    #[test]
    fn test_course_defaults_and_names() {
        let course: Course = serde_json::from_str(
            r#"{
                "id": "bio-101",
                "name": "Biology",
                "quizzes": [
                    [{"id":1,"text":"q","options":["a","b"],"answerIndex":0}],
                    [{"id":2,"text":"q","options":["a","b"],"answerIndices":[1]}]
                ],
                "quizNames": ["Cells", ""]
            }"#,
        )
        .unwrap();

        assert_eq!(course.quiz_sorting_preference, SortingPreference::Sequential);
        assert_eq!(course.quiz_name(0), "Cells");
        assert_eq!(course.quiz_name(1), "Quiz 2");
        assert_eq!(course.quiz_names().len(), 2);
        assert!(course.quiz(2).is_none());
    }

    #[test]
    fn test_course_with_invalid_question_is_rejected() {
        let result = serde_json::from_str::<Course>(
            r#"{"id":"c","name":"n","quizzes":[[{"id":1,"text":"q","options":["a","b"],"answerIndices":[5]}]]}"#,
        );
        assert!(result.is_err());
    }
}
