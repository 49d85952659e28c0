// src/quiz/scoring.rs

use std::collections::BTreeSet;

/// Returns true iff the selection matches the correct set exactly.
///
/// No partial credit: a strict subset or superset of `correct` is wrong.
pub fn evaluate(selected: &BTreeSet<usize>, correct: &BTreeSet<usize>) -> bool {
    selected == correct
}
