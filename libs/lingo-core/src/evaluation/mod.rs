//! Answer evaluation.
//!
//! Local heuristics run first; when they do not produce a confident match the
//! remote judge is consulted under a timeout. Any judge failure falls back to
//! the local result, so evaluation itself never fails.

pub mod judge;
pub mod local;
pub mod normalize;
pub mod similarity;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{JudgeError, Result};
use crate::types::{AnswerRecord, ExerciseType, Verdict};
use judge::{Judge, JudgeRequest};
use local::{evaluate_locally, MatchRule};

/// Evaluator thresholds and judge timeout.
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    pub judge_timeout: Duration,
    pub high_similarity: f64,
    pub medium_similarity: f64,
    /// Similarity accepted when both sides have at most `short_answer_max_tokens` tokens.
    pub short_answer_similarity: f64,
    pub short_answer_max_tokens: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            judge_timeout: Duration::from_secs(8),
            high_similarity: 0.92,
            medium_similarity: 0.85,
            short_answer_similarity: 0.85,
            short_answer_max_tokens: 2,
        }
    }
}

/// Stateless answer evaluator.
#[derive(Clone)]
pub struct Evaluator {
    judge: Option<Arc<dyn Judge>>,
    config: EvaluatorConfig,
}

impl Evaluator {
    pub fn new(judge: Arc<dyn Judge>) -> Self {
        Self {
            judge: Some(judge),
            config: EvaluatorConfig::default(),
        }
    }

    /// Evaluator that never calls a judge.
    pub fn local_only() -> Self {
        Self {
            judge: None,
            config: EvaluatorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EvaluatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluate loose inputs. Blank optionals are treated as absent.
    pub async fn evaluate_answer(
        &self,
        user_answer: &str,
        correct_answer: &str,
        exercise_type: ExerciseType,
        context: Option<&str>,
        lesson_kind: Option<&str>,
    ) -> Verdict {
        let mut record = AnswerRecord::new(user_answer, correct_answer, exercise_type);
        record.context = context.map(str::to_string);
        record.lesson_kind = lesson_kind.map(str::to_string);
        self.evaluate(&record).await
    }

    /// Evaluate a submission. Always returns a verdict.
    pub async fn evaluate(&self, record: &AnswerRecord) -> Verdict {
        let local = evaluate_locally(record, &self.config);

        if local.verdict.is_confident_match() {
            debug!(rule = ?local.rule, similarity = local.similarity, "local match");
            return local.verdict;
        }

        // A blank answer can never be judged correct, so the judge is skipped.
        if local.rule == MatchRule::Empty {
            return local.verdict;
        }

        let Some(judge) = self.judge.as_deref() else {
            return local.verdict;
        };

        debug!(judge = judge.name(), similarity = local.similarity, "consulting judge");
        match self.consult(judge, record).await {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!(judge = judge.name(), error = %e, "judge failed, using local result");
                local.verdict
            }
        }
    }

    async fn consult(&self, judge: &dyn Judge, record: &AnswerRecord) -> Result<Verdict> {
        let request = JudgeRequest::from_record(record);
        tokio::time::timeout(self.config.judge_timeout, judge.judge(&request))
            .await
            .map_err(|_| JudgeError::Timeout(self.config.judge_timeout))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Confidence;
    use super::judge::fixtures::StaticJudge;
    use pretty_assertions::assert_eq;

    fn with_judge(judge: StaticJudge) -> (Evaluator, Arc<StaticJudge>) {
        let judge = Arc::new(judge);
        (Evaluator::new(judge.clone()), judge)
    }

    #[tokio::test]
    async fn confident_local_match_skips_judge() {
        let (evaluator, judge) = with_judge(StaticJudge::answering(Verdict::incorrect(Confidence::High)));

        let verdict = evaluator
            .evaluate_answer("I am fine.", "i am fine", ExerciseType::TranslateTyping, None, None)
            .await;
        assert_eq!(verdict, Verdict::correct(Confidence::High));

        let verdict = evaluator
            .evaluate_answer("my favourite colour", "my favorite color", ExerciseType::TranslateTyping, None, None)
            .await;
        assert!(verdict.is_confident_match());

        let verdict = evaluator
            .evaluate_answer("fine I am", "I am fine", ExerciseType::TranslateTyping, None, None)
            .await;
        assert!(verdict.is_confident_match());
        assert_eq!(judge.calls(), 0);
    }

    #[tokio::test]
    async fn idiom_word_order_goes_to_judge() {
        let judged = Verdict::incorrect(Confidence::High).with_reason("not the idiom");
        let (evaluator, judge) = with_judge(StaticJudge::answering(judged.clone()));

        let verdict = evaluator
            .evaluate_answer("fine I am", "I am fine", ExerciseType::TranslateTyping, None, Some("idioms"))
            .await;
        assert_eq!(verdict, judged);
        assert_eq!(judge.calls(), 1);
    }

    #[tokio::test]
    async fn judge_verdict_is_trusted_over_similarity() {
        // Medium local match, judge disagrees.
        let judged = Verdict::incorrect(Confidence::High).with_reason("different word");
        let (evaluator, _) = with_judge(StaticJudge::answering(judged.clone()));

        let user = format!("{}{} {} {}", "x".repeat(14), "a".repeat(18), "b".repeat(33), "c".repeat(33));
        let correct = format!("{} {} {}", "a".repeat(32), "b".repeat(33), "c".repeat(33));
        let verdict = evaluator
            .evaluate_answer(&user, &correct, ExerciseType::TranslateTyping, None, None)
            .await;
        assert_eq!(verdict, judged);
    }

    #[tokio::test]
    async fn judge_failure_falls_back_to_local() {
        let (evaluator, judge) = with_judge(StaticJudge::failing());
        let record = AnswerRecord::new("a cat sat", "the dog ran away", ExerciseType::Listening);

        let expected = evaluate_locally(&record, evaluator.config()).verdict;
        let verdict = evaluator.evaluate(&record).await;
        assert_eq!(verdict, expected);
        assert_eq!(verdict, Verdict::incorrect(Confidence::Low));
        assert_eq!(judge.calls(), 1);
    }

    #[tokio::test]
    async fn judge_timeout_falls_back_to_local() {
        let judge = StaticJudge::answering(Verdict::correct(Confidence::High))
            .with_delay(Duration::from_millis(500));
        let evaluator = Evaluator::new(Arc::new(judge)).with_config(EvaluatorConfig {
            judge_timeout: Duration::from_millis(20),
            ..Default::default()
        });

        let user = format!("{}{} {} {}", "x".repeat(14), "a".repeat(18), "b".repeat(33), "c".repeat(33));
        let correct = format!("{} {} {}", "a".repeat(32), "b".repeat(33), "c".repeat(33));
        let verdict = evaluator
            .evaluate_answer(&user, &correct, ExerciseType::TranslateTyping, None, None)
            .await;
        assert_eq!(verdict.confidence, Confidence::Medium);
        assert!(verdict.is_correct);
    }

    #[tokio::test]
    async fn empty_answer_is_not_sent_to_judge() {
        let (evaluator, judge) = with_judge(StaticJudge::answering(Verdict::correct(Confidence::High)));
        let verdict = evaluator
            .evaluate(&AnswerRecord {
                correct_answer: "hello".to_string(),
                ..Default::default()
            })
            .await;
        assert!(!verdict.is_correct);
        assert_eq!(verdict.confidence, Confidence::Low);
        assert_eq!(judge.calls(), 0);
    }

    #[tokio::test]
    async fn local_only_returns_local_result() {
        let verdict = Evaluator::local_only()
            .evaluate_answer("something else", "hello there", ExerciseType::WordBubbles, None, None)
            .await;
        assert_eq!(verdict, Verdict::incorrect(Confidence::Low));
    }
}
