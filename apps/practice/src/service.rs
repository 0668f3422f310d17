//! Practice flow: evaluate a submission, then schedule and persist the word.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use lingo_core::{
    derive_profile, prioritize, AnswerRecord, DifficultyProfile, Evaluator, PrioritizedWord,
    Sm2Scheduler, Verdict, WordMasteryRecord,
};
use serde::Serialize;
use tracing::warn;

use crate::config::PracticeConfig;
use crate::error::{ConfigError, StoreError};
use crate::judge::HttpJudge;
use crate::store::MasteryStore;

/// Result of one practice submission.
#[derive(Debug, Clone, Serialize)]
pub struct PracticeOutcome {
    pub verdict: Verdict,
    /// Updated record, or `None` when the previous record could not be loaded.
    pub record: Option<WordMasteryRecord>,
    pub persisted: bool,
}

pub struct PracticeService {
    evaluator: Evaluator,
    scheduler: Sm2Scheduler,
    store: Arc<dyn MasteryStore>,
}

impl PracticeService {
    pub fn new(evaluator: Evaluator, store: Arc<dyn MasteryStore>) -> Self {
        Self {
            evaluator,
            scheduler: Sm2Scheduler::default(),
            store,
        }
    }

    /// Service with the HTTP judge configured from the environment.
    pub fn from_env(store: Arc<dyn MasteryStore>) -> Result<Self, ConfigError> {
        let config = PracticeConfig::from_env()?;
        Ok(Self::from_config(config, store))
    }

    pub fn from_config(config: PracticeConfig, store: Arc<dyn MasteryStore>) -> Self {
        let judge = Arc::new(HttpJudge::new(config.judge));
        let evaluator = Evaluator::new(judge).with_config(config.evaluator);
        Self::new(evaluator, store)
    }

    pub fn with_scheduler(mut self, scheduler: Sm2Scheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Evaluate a learner's answer for `word` and update that word's record.
    ///
    /// Storage failures are logged and reported through the outcome, never
    /// returned as errors.
    pub async fn submit(
        &self,
        learner_id: &str,
        word: &str,
        answer: &AnswerRecord,
        now: DateTime<Utc>,
    ) -> PracticeOutcome {
        let verdict = self.evaluator.evaluate(answer).await;

        let existing = match self.store.get(learner_id, word).await {
            Ok(existing) => existing,
            Err(e) => {
                warn!(learner_id, word, error = %e, "failed to load mastery record, skipping update");
                return PracticeOutcome {
                    verdict,
                    record: None,
                    persisted: false,
                };
            }
        };

        let record = self
            .scheduler
            .update(word, existing.as_ref(), verdict.is_correct, now);

        let persisted = match self.store.upsert(learner_id, &record).await {
            Ok(()) => true,
            Err(e) => {
                warn!(learner_id, word, error = %e, "failed to save mastery record");
                false
            }
        };

        PracticeOutcome {
            verdict,
            record: Some(record),
            persisted,
        }
    }

    /// Top `limit` lesson words to practice next.
    pub async fn practice_set<S: AsRef<str> + Sync>(
        &self,
        learner_id: &str,
        lesson_words: &[S],
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<PrioritizedWord>, StoreError> {
        let records = self.store.list(learner_id).await?;
        Ok(prioritize(lesson_words, &records, now, limit))
    }

    pub async fn difficulty_profile(
        &self,
        learner_id: &str,
        user_level: u32,
        now: DateTime<Utc>,
    ) -> Result<DifficultyProfile, StoreError> {
        let records = self.store.list(learner_id).await?;
        Ok(derive_profile(&records, user_level, now))
    }
}
