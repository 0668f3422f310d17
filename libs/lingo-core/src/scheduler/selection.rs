//! Choosing which words to practice next.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{MasteryLevel, WordMasteryRecord};

const REVIEW_SCORE: u32 = 100;
const PROBLEM_SCORE: u32 = 90;
const NEW_SCORE: u32 = 80;
const NORMAL_BASE_SCORE: i64 = 50;
const NORMAL_DECAY_PER_DAY: i64 = 5;

/// Why a word was put in a practice set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PracticeReason {
    Review,
    Problem,
    New,
    Normal,
}

/// A lesson word with its practice priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrioritizedWord {
    pub word: String,
    pub reason: PracticeReason,
    pub score: u32,
}

/// A word is due when it has history and its review time has passed.
pub fn is_due(record: Option<&WordMasteryRecord>, now: DateTime<Utc>) -> bool {
    record.is_some_and(|r| r.next_review_at <= now)
}

pub fn is_problem_word(record: &WordMasteryRecord) -> bool {
    record.incorrect_count > record.correct_count
        || matches!(record.mastery_level, MasteryLevel::Learning | MasteryLevel::New)
}

/// Records due for review, earliest first.
pub fn due_words(records: &[WordMasteryRecord], now: DateTime<Utc>) -> Vec<&WordMasteryRecord> {
    let mut due: Vec<&WordMasteryRecord> =
        records.iter().filter(|r| is_due(Some(*r), now)).collect();
    due.sort_by_key(|r| r.next_review_at);
    due
}

/// Problem words, most missed first.
pub fn problem_words(records: &[WordMasteryRecord], limit: usize) -> Vec<&WordMasteryRecord> {
    let mut problems: Vec<&WordMasteryRecord> =
        records.iter().filter(|r| is_problem_word(r)).collect();
    problems.sort_by(|a, b| b.incorrect_count.cmp(&a.incorrect_count));
    problems.truncate(limit);
    problems
}

/// Rank a lesson's words for practice and keep the top `limit`.
///
/// Review beats problem beats new beats normal. Normal words lose five
/// points per day since their last review. Equal scores keep lesson order.
pub fn prioritize<S: AsRef<str>>(
    lesson_words: &[S],
    records: &[WordMasteryRecord],
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<PrioritizedWord> {
    let by_word: HashMap<&str, &WordMasteryRecord> =
        records.iter().map(|r| (r.word.as_str(), r)).collect();
    let mut seen = HashSet::new();

    let mut ranked: Vec<PrioritizedWord> = lesson_words
        .iter()
        .map(|w| WordMasteryRecord::key(w.as_ref()))
        .filter(|key| !key.is_empty() && seen.insert(key.clone()))
        .map(|word| {
            let (reason, score) = match by_word.get(word.as_str()).copied() {
                None => (PracticeReason::New, NEW_SCORE),
                Some(r) if is_due(Some(r), now) => (PracticeReason::Review, REVIEW_SCORE),
                Some(r)
                    if r.mastery_level == MasteryLevel::Learning
                        || r.incorrect_count > r.correct_count =>
                {
                    (PracticeReason::Problem, PROBLEM_SCORE)
                }
                Some(r) => (PracticeReason::Normal, normal_score(r, now)),
            };
            PrioritizedWord { word, reason, score }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(limit);
    ranked
}

fn normal_score(record: &WordMasteryRecord, now: DateTime<Utc>) -> u32 {
    let days = (now - record.last_reviewed_at).num_days().max(0);
    (NORMAL_BASE_SCORE - days * NORMAL_DECAY_PER_DAY).max(0) as u32
}
