//! Remote semantic judge seam.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AnswerRecord, ExerciseType, Verdict};

/// Everything the judge sees about a submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JudgeRequest<'a> {
    pub user_answer: &'a str,
    pub correct_answer: &'a str,
    pub exercise_type: ExerciseType,
    pub context: Option<&'a str>,
    pub lesson_kind: Option<&'a str>,
}

impl<'a> JudgeRequest<'a> {
    pub fn from_record(record: &'a AnswerRecord) -> Self {
        Self {
            user_answer: &record.user_answer,
            correct_answer: &record.correct_answer,
            exercise_type: record.exercise_type,
            context: record.context.as_deref().filter(|c| !c.trim().is_empty()),
            lesson_kind: record.lesson_kind.as_deref().filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn is_idiom_lesson(&self) -> bool {
        self.lesson_kind
            .is_some_and(|kind| kind.trim().eq_ignore_ascii_case("idioms"))
    }
}

/// A language-model-backed answer judge. Its verdict is trusted as-is.
#[async_trait]
pub trait Judge: Send + Sync {
    /// Judge identifier, used in logs.
    fn name(&self) -> &str;

    /// Decide whether the submission is correct.
    async fn judge(&self, request: &JudgeRequest<'_>) -> Result<Verdict>;
}
