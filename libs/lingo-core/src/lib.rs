//! Core answer-evaluation and spaced-repetition library.
//!
//! Provides:
//! - Answer evaluation for typed exercises (normalization, spelling variants,
//!   word order, Levenshtein typo tolerance, remote judge with local fallback)
//! - SM-2 style word mastery scheduling
//! - Practice-set ranking and difficulty profiles over mastery records
//! - Shared types (Verdict, WordMasteryRecord, Exercise, etc.)

pub mod error;
pub mod evaluation;
pub mod scheduler;
pub mod types;

pub use error::{JudgeError, Result};
pub use evaluation::judge::{Judge, JudgeRequest};
pub use evaluation::local::{evaluate_locally, LocalMatch, MatchRule};
pub use evaluation::normalize::normalize;
pub use evaluation::similarity::{levenshtein_distance, normalized_similarity};
pub use evaluation::{Evaluator, EvaluatorConfig};
pub use scheduler::profile::{derive_profile, DifficultyLevel, DifficultyProfile};
pub use scheduler::selection::{
    due_words, is_due, is_problem_word, prioritize, problem_words, PracticeReason, PrioritizedWord,
};
pub use scheduler::sm2::Sm2Scheduler;
pub use types::{
    AnswerRecord, Confidence, Exercise, ExerciseType, MasteryLevel, Verdict, WordMasteryRecord,
};
