// src/quiz/shuffle.rs

//! Randomized question and option ordering.
//!
//! Every function takes the random source as a parameter so callers (and tests)
//! control seeding. Inputs are never mutated.

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::models::{course::SortingPreference, question::Question};

/// Returns the questions in a new random order.
pub fn shuffle_order<R: Rng + ?Sized>(questions: &[Question], rng: &mut R) -> Vec<Question> {
    let mut shuffled = questions.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

/// Returns a copy of `question` with its options permuted.
///
/// Correct answers are tracked by option text: each originally correct option
/// (in ascending index order) is mapped to the first position in the new list
/// holding the same text. With duplicate option texts this can collapse two
/// correct indices into one.
pub fn shuffle_options<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> Question {
    let mut options = question.options().to_vec();
    options.shuffle(rng);

    let answer_indices: BTreeSet<usize> = question
        .correct_texts()
        .into_iter()
        .filter_map(|text| options.iter().position(|o| o == text))
        .collect();

    question.with_options(options, answer_indices)
}

/// Produces the working question list for a new session.
///
/// `Random` shuffles question order and then every question's options;
/// `Sequential` returns an untouched copy.
pub fn prepare_session<R: Rng + ?Sized>(
    questions: &[Question],
    preference: SortingPreference,
    rng: &mut R,
) -> Vec<Question> {
    match preference {
        SortingPreference::Sequential => questions.to_vec(),
        SortingPreference::Random => shuffle_order(questions, rng)
            .iter()
            .map(|q| shuffle_options(q, rng))
            .collect(),
    }
}
