//! Local fast path: cheap heuristics that run before any remote call.

use serde::{Deserialize, Serialize};

use super::normalize::{americanize, normalize, sorted_tokens, token_count};
use super::similarity::normalized_similarity;
use super::EvaluatorConfig;
use crate::types::{AnswerRecord, Confidence, Verdict};

/// Which local rule produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// Blank submission against a non-blank answer.
    Empty,
    Exact,
    Spelling,
    WordOrder,
    ShortAnswer,
    Similarity,
    NoMatch,
}

/// Result of the local stage.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalMatch {
    pub verdict: Verdict,
    pub rule: MatchRule,
    /// Similarity of the normalized strings, 0.0 to 1.0.
    pub similarity: f64,
}

impl LocalMatch {
    fn new(verdict: Verdict, rule: MatchRule, similarity: f64) -> Self {
        Self {
            verdict,
            rule,
            similarity,
        }
    }
}

/// Evaluate a submission using only local heuristics.
pub fn evaluate_locally(record: &AnswerRecord, config: &EvaluatorConfig) -> LocalMatch {
    let user = normalize(&record.user_answer);
    let correct = normalize(&record.correct_answer);

    if user.is_empty() && !correct.is_empty() {
        return LocalMatch::new(
            Verdict::incorrect(Confidence::Low).with_reason("empty answer"),
            MatchRule::Empty,
            0.0,
        );
    }

    if user == correct {
        return LocalMatch::new(Verdict::correct(Confidence::High), MatchRule::Exact, 1.0);
    }

    if americanize(&user) == americanize(&correct) {
        return LocalMatch::new(
            Verdict::correct(Confidence::High).with_reason("spelling variant"),
            MatchRule::Spelling,
            1.0,
        );
    }

    // Idioms are fixed phrases; reordered words are a different phrase.
    if !record.is_idiom_lesson() && sorted_tokens(&user) == sorted_tokens(&correct) {
        return LocalMatch::new(
            Verdict::correct(Confidence::High).with_reason("word order differs"),
            MatchRule::WordOrder,
            1.0,
        );
    }

    let similarity = normalized_similarity(&user, &correct);

    let is_short = token_count(&user) <= config.short_answer_max_tokens
        && token_count(&correct) <= config.short_answer_max_tokens;
    if is_short && similarity >= config.short_answer_similarity {
        return LocalMatch::new(
            Verdict::correct(Confidence::High).with_reason("minor typo"),
            MatchRule::ShortAnswer,
            similarity,
        );
    }

    if similarity >= config.high_similarity {
        LocalMatch::new(
            Verdict::correct(Confidence::High).with_reason("minor typo"),
            MatchRule::Similarity,
            similarity,
        )
    } else if similarity >= config.medium_similarity {
        LocalMatch::new(
            Verdict::correct(Confidence::Medium).with_reason("close match"),
            MatchRule::Similarity,
            similarity,
        )
    } else {
        LocalMatch::new(Verdict::incorrect(Confidence::Low), MatchRule::NoMatch, similarity)
    }
}
