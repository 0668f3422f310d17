//! Difficulty profile used as exercise-generation hints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::selection::{is_due, is_problem_word};
use crate::types::{MasteryLevel, WordMasteryRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl DifficultyLevel {
    /// Exercise complexity hint, 1 to 3.
    pub fn complexity(self) -> u8 {
        match self {
            Self::Beginner => 1,
            Self::Intermediate => 2,
            Self::Advanced => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub level: DifficultyLevel,
    pub avg_correct_rate: f64,
    pub mastered_ratio: f64,
    pub exercise_complexity: u8,
    /// Some record is a problem word.
    pub focus_on_problem_words: bool,
    /// Some record is due for review.
    pub include_review_words: bool,
}

/// Summarize a learner's records into generation hints.
pub fn derive_profile(
    records: &[WordMasteryRecord],
    user_level: u32,
    now: DateTime<Utc>,
) -> DifficultyProfile {
    let attempts: u32 = records.iter().map(|r| r.total_attempts()).sum();
    let correct: u32 = records.iter().map(|r| r.correct_count).sum();
    let avg_correct_rate = if attempts > 0 {
        f64::from(correct) / f64::from(attempts)
    } else {
        0.0
    };

    let mastered = records
        .iter()
        .filter(|r| r.mastery_level == MasteryLevel::Mastered)
        .count();
    let mastered_ratio = if records.is_empty() {
        0.0
    } else {
        mastered as f64 / records.len() as f64
    };

    let level = if user_level >= 10 && mastered_ratio > 0.5 && avg_correct_rate > 0.8 {
        DifficultyLevel::Advanced
    } else if user_level >= 5 && mastered_ratio > 0.2 && avg_correct_rate > 0.6 {
        DifficultyLevel::Intermediate
    } else {
        DifficultyLevel::Beginner
    };

    DifficultyProfile {
        level,
        avg_correct_rate,
        mastered_ratio,
        exercise_complexity: level.complexity(),
        focus_on_problem_words: records.iter().any(is_problem_word),
        include_review_words: records.iter().any(|r| is_due(Some(r), now)),
    }
}
