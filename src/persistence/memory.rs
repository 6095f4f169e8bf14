use ahash::AHashMap;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::error::Result;
use crate::core::types::LearnerId;
use crate::persistence::{PlacementRecord, PlacementStore};

/// Process-local store, mostly for tests and the headless runner
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<AHashMap<LearnerId, PlacementRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl PlacementStore for MemoryStore {
    async fn save(&self, record: &PlacementRecord) -> Result<()> {
        self.records
            .write()
            .await
            .insert(record.learner, record.clone());
        Ok(())
    }

    async fn load(&self, learner: LearnerId) -> Result<Option<PlacementRecord>> {
        Ok(self.records.read().await.get(&learner).cloned())
    }
}
