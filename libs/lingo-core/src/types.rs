//! Core types for answer evaluation and mastery scheduling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Exercise kinds a learner can answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExerciseType {
    MultipleChoice,
    TranslateTyping,
    WordBubbles,
    MatchingPairs,
    Listening,
}

impl Default for ExerciseType {
    fn default() -> Self {
        Self::TranslateTyping
    }
}

impl ExerciseType {
    /// Get the exercise type as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple-choice",
            Self::TranslateTyping => "translate-typing",
            Self::WordBubbles => "word-bubbles",
            Self::MatchingPairs => "matching-pairs",
            Self::Listening => "listening",
        }
    }

    /// Parse from wire string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "multiple-choice" => Some(Self::MultipleChoice),
            "translate-typing" => Some(Self::TranslateTyping),
            "word-bubbles" => Some(Self::WordBubbles),
            "matching-pairs" => Some(Self::MatchingPairs),
            "listening" => Some(Self::Listening),
            _ => None,
        }
    }
}

/// An exercise as presented to the learner, carrying only the fields its kind needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Exercise {
    MultipleChoice {
        prompt: String,
        options: Vec<String>,
        correct_index: usize,
    },
    TranslateTyping {
        prompt: String,
        answer: String,
    },
    WordBubbles {
        prompt: String,
        bubbles: Vec<String>,
        answer: String,
    },
    MatchingPairs {
        pairs: Vec<(String, String)>,
    },
    Listening {
        transcript: String,
        answer: String,
    },
}

impl Exercise {
    pub fn kind(&self) -> ExerciseType {
        match self {
            Self::MultipleChoice { .. } => ExerciseType::MultipleChoice,
            Self::TranslateTyping { .. } => ExerciseType::TranslateTyping,
            Self::WordBubbles { .. } => ExerciseType::WordBubbles,
            Self::MatchingPairs { .. } => ExerciseType::MatchingPairs,
            Self::Listening { .. } => ExerciseType::Listening,
        }
    }

    /// The single answer string a submission is compared against.
    ///
    /// Matching pairs have no single expected answer; a multiple-choice
    /// exercise with an out-of-range index has none either.
    pub fn expected_answer(&self) -> Option<String> {
        match self {
            Self::MultipleChoice {
                options,
                correct_index,
                ..
            } => options.get(*correct_index).cloned(),
            Self::TranslateTyping { answer, .. }
            | Self::WordBubbles { answer, .. }
            | Self::Listening { answer, .. } => Some(answer.clone()),
            Self::MatchingPairs { .. } => None,
        }
    }
}

/// A single learner submission. Missing fields deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerRecord {
    pub user_answer: String,
    pub correct_answer: String,
    pub exercise_type: ExerciseType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl AnswerRecord {
    pub fn new(
        user_answer: impl Into<String>,
        correct_answer: impl Into<String>,
        exercise_type: ExerciseType,
    ) -> Self {
        Self {
            user_answer: user_answer.into(),
            correct_answer: correct_answer.into(),
            exercise_type,
            lesson_kind: None,
            context: None,
        }
    }

    /// Build a submission for an exercise. Exercises without a single
    /// expected answer compare against the empty string.
    pub fn for_exercise(exercise: &Exercise, user_answer: impl Into<String>) -> Self {
        Self::new(
            user_answer,
            exercise.expected_answer().unwrap_or_default(),
            exercise.kind(),
        )
    }

    pub fn with_lesson_kind(mut self, lesson_kind: impl Into<String>) -> Self {
        self.lesson_kind = Some(lesson_kind.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Whether this submission belongs to an idiom lesson.
    pub fn is_idiom_lesson(&self) -> bool {
        self.lesson_kind
            .as_deref()
            .is_some_and(|kind| kind.trim().eq_ignore_ascii_case("idioms"))
    }
}

/// Confidence attached to a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Outcome of evaluating a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub is_correct: bool,
    pub confidence: Confidence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Verdict {
    pub fn correct(confidence: Confidence) -> Self {
        Self {
            is_correct: true,
            confidence,
            reason: None,
        }
    }

    pub fn incorrect(confidence: Confidence) -> Self {
        Self {
            is_correct: false,
            confidence,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// A positive verdict the evaluator can return without consulting the judge.
    pub fn is_confident_match(&self) -> bool {
        self.is_correct && self.confidence == Confidence::High
    }
}

/// Discrete memorization strength of a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryLevel {
    New,
    Learning,
    Reviewing,
    Mastered,
}

impl Default for MasteryLevel {
    fn default() -> Self {
        Self::New
    }
}

/// Per-learner, per-word memory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordMasteryRecord {
    /// Lowercased, trimmed word key.
    pub word: String,
    pub ease_factor: f64,
    pub interval_days: u32,
    pub repetition_count: u32,
    pub correct_count: u32,
    pub incorrect_count: u32,
    pub next_review_at: DateTime<Utc>,
    pub mastery_level: MasteryLevel,
    pub last_reviewed_at: DateTime<Utc>,
}

impl WordMasteryRecord {
    /// Fresh record for a word seen for the first time.
    pub fn new(word: &str, now: DateTime<Utc>) -> Self {
        Self {
            word: Self::key(word),
            ease_factor: 2.5,
            interval_days: 1,
            repetition_count: 0,
            correct_count: 0,
            incorrect_count: 0,
            next_review_at: now,
            mastery_level: MasteryLevel::New,
            last_reviewed_at: now,
        }
    }

    /// Normalize a word into its storage key.
    pub fn key(word: &str) -> String {
        word.trim().to_lowercase()
    }

    pub fn total_attempts(&self) -> u32 {
        self.correct_count + self.incorrect_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn exercise_type_round_trips_wire_names() {
        for kind in [
            ExerciseType::MultipleChoice,
            ExerciseType::TranslateTyping,
            ExerciseType::WordBubbles,
            ExerciseType::MatchingPairs,
            ExerciseType::Listening,
        ] {
            assert_eq!(ExerciseType::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(ExerciseType::from_str("essay"), None);
    }

    #[test]
    fn multiple_choice_resolves_option_text() {
        let exercise = Exercise::MultipleChoice {
            prompt: "Pick the greeting".to_string(),
            options: vec!["goodbye".to_string(), "hello".to_string()],
            correct_index: 1,
        };
        assert_eq!(exercise.kind(), ExerciseType::MultipleChoice);
        assert_eq!(exercise.expected_answer().as_deref(), Some("hello"));

        let broken = Exercise::MultipleChoice {
            prompt: String::new(),
            options: vec![],
            correct_index: 3,
        };
        assert_eq!(broken.expected_answer(), None);
    }

    #[test]
    fn matching_pairs_have_no_single_answer() {
        let exercise = Exercise::MatchingPairs {
            pairs: vec![("cat".to_string(), "gato".to_string())],
        };
        let record = AnswerRecord::for_exercise(&exercise, "gato");
        assert_eq!(record.correct_answer, "");
        assert_eq!(record.exercise_type, ExerciseType::MatchingPairs);
    }

    #[test]
    fn exercise_deserializes_from_tagged_json() {
        let json = r#"{"type":"listening","transcript":"good morning","answer":"good morning"}"#;
        let exercise: Exercise = serde_json::from_str(json).unwrap();
        assert_eq!(exercise.kind(), ExerciseType::Listening);
    }

    #[test]
    fn answer_record_missing_fields_default_to_empty() {
        let record: AnswerRecord = serde_json::from_str(r#"{"user_answer":"hi"}"#).unwrap();
        assert_eq!(record.user_answer, "hi");
        assert_eq!(record.correct_answer, "");
        assert_eq!(record.exercise_type, ExerciseType::TranslateTyping);
        assert_eq!(record.lesson_kind, None);
    }

    #[test]
    fn idiom_lesson_detection_ignores_case() {
        let record = AnswerRecord::new("a", "b", ExerciseType::TranslateTyping);
        assert!(!record.is_idiom_lesson());
        assert!(record.clone().with_lesson_kind("Idioms").is_idiom_lesson());
        assert!(!record.with_lesson_kind("idiomatic verbs").is_idiom_lesson());
    }

    #[test]
    fn confidence_parses_loosely() {
        assert_eq!(Confidence::from_str(" HIGH "), Some(Confidence::High));
        assert_eq!(Confidence::from_str("medium"), Some(Confidence::Medium));
        assert_eq!(Confidence::from_str("certain"), None);
    }

    #[test]
    fn new_record_uses_defaults_and_lowercase_key() {
        let now = Utc::now();
        let record = WordMasteryRecord::new("  Apple ", now);
        assert_eq!(record.word, "apple");
        assert_eq!(record.ease_factor, 2.5);
        assert_eq!(record.interval_days, 1);
        assert_eq!(record.repetition_count, 0);
        assert_eq!(record.mastery_level, MasteryLevel::New);
        assert_eq!(record.total_attempts(), 0);
    }
}
