// src/quiz/mod.rs

pub mod scoring;
pub mod session;
pub mod shuffle;

pub use session::{Advance, MissedQuestion, Phase, QuizSession, QuizSummary, SessionView};
