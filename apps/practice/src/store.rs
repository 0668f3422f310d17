//! Mastery record storage.

use std::collections::HashMap;

use async_trait::async_trait;
use lingo_core::WordMasteryRecord;
use tokio::sync::RwLock;

use crate::error::StoreError;

/// Storage for mastery records keyed by `(learner_id, lowercase word)`.
///
/// Writes are last-write-wins; concurrency control is up to the backend.
#[async_trait]
pub trait MasteryStore: Send + Sync {
    async fn get(&self, learner_id: &str, word: &str)
        -> Result<Option<WordMasteryRecord>, StoreError>;

    async fn upsert(&self, learner_id: &str, record: &WordMasteryRecord) -> Result<(), StoreError>;

    /// All records for a learner, in no particular order.
    async fn list(&self, learner_id: &str) -> Result<Vec<WordMasteryRecord>, StoreError>;
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<(String, String), WordMasteryRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(learner_id: &str, word: &str) -> (String, String) {
        (learner_id.to_string(), WordMasteryRecord::key(word))
    }
}

#[async_trait]
impl MasteryStore for InMemoryStore {
    async fn get(
        &self,
        learner_id: &str,
        word: &str,
    ) -> Result<Option<WordMasteryRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.get(&Self::key(learner_id, word)).cloned())
    }

    async fn upsert(&self, learner_id: &str, record: &WordMasteryRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.insert(Self::key(learner_id, &record.word), record.clone());
        Ok(())
    }

    async fn list(&self, learner_id: &str) -> Result<Vec<WordMasteryRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|((learner, _), _)| learner == learner_id)
            .map(|(_, record)| record.clone())
            .collect())
    }
}
