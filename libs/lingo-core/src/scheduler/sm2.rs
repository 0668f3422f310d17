//! SM-2 word mastery scheduling.
//!
//! Based on SuperMemo 2 with a binary correct/incorrect grade.

use chrono::{DateTime, Duration, Utc};

use crate::types::{MasteryLevel, WordMasteryRecord};

/// SM-2 scheduler with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2Scheduler {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    pub ease_bonus: f64,
    pub ease_penalty: f64,
    pub second_interval_days: u32,
    pub mastered_repetitions: u32,
    pub mastered_interval_days: u32,
    pub maximum_interval_days: u32,
}

impl Default for Sm2Scheduler {
    fn default() -> Self {
        Self {
            initial_ease: 2.5,
            minimum_ease: 1.3,
            ease_bonus: 0.1,
            ease_penalty: 0.2,
            second_interval_days: 6,
            mastered_repetitions: 5,
            mastered_interval_days: 21,
            maximum_interval_days: 36500,
        }
    }
}

impl Sm2Scheduler {
    /// Record for a word that has no history yet.
    pub fn initial_record(&self, word: &str, now: DateTime<Utc>) -> WordMasteryRecord {
        WordMasteryRecord {
            ease_factor: self.initial_ease,
            ..WordMasteryRecord::new(word, now)
        }
    }

    /// Apply one answer to a word's record.
    pub fn update(
        &self,
        word: &str,
        record: Option<&WordMasteryRecord>,
        is_correct: bool,
        now: DateTime<Utc>,
    ) -> WordMasteryRecord {
        let mut next = match record {
            Some(existing) => existing.clone(),
            None => self.initial_record(word, now),
        };

        if is_correct {
            next.repetition_count += 1;
            next.interval_days = match next.repetition_count {
                1 => 1,
                2 => self.second_interval_days,
                // Float-to-int casts saturate, the cap below bounds the result.
                _ => ((f64::from(next.interval_days) * next.ease_factor).round() as u32).max(1),
            }
            .min(self.maximum_interval_days);
            next.ease_factor = (next.ease_factor + self.ease_bonus).max(self.minimum_ease);
            next.correct_count += 1;
        } else {
            next.repetition_count = 0;
            next.interval_days = 1;
            next.ease_factor = (next.ease_factor - self.ease_penalty).max(self.minimum_ease);
            next.incorrect_count += 1;
        }

        next.next_review_at = now
            .checked_add_signed(Duration::days(i64::from(next.interval_days)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        next.last_reviewed_at = now;
        next.mastery_level = self.mastery_level(next.repetition_count, next.interval_days);
        next
    }

    /// Tier implied by repetition count and interval.
    pub fn mastery_level(&self, repetition_count: u32, interval_days: u32) -> MasteryLevel {
        if repetition_count >= self.mastered_repetitions
            && interval_days >= self.mastered_interval_days
        {
            MasteryLevel::Mastered
        } else if repetition_count >= 2 {
            MasteryLevel::Reviewing
        } else if repetition_count >= 1 {
            MasteryLevel::Learning
        } else {
            MasteryLevel::New
        }
    }
}
