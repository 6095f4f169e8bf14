//! Placement persistence contract and implementations
//!
//! The engine never performs I/O itself. A finished `PlacementResult` is
//! wrapped in a [`PlacementRecord`] and handed to a [`PlacementStore`],
//! usually through the [`PlacementOutbox`] so the caller does not wait on
//! the write. A store keeps only the latest placement per learner.

mod file;
mod memory;
mod outbox;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use outbox::{OutboxStats, PlacementOutbox};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::LearnerId;
use crate::placement::PlacementResult;

/// A learner's current placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRecord {
    pub learner: LearnerId,
    pub result: PlacementResult,
    pub completed_at: DateTime<Utc>,
}

impl PlacementRecord {
    pub fn new(learner: LearnerId, result: PlacementResult) -> Self {
        Self {
            learner,
            result,
            completed_at: Utc::now(),
        }
    }
}

/// Read and write a learner's current placement
///
/// `save` overwrites whatever was stored for the same learner.
#[async_trait]
pub trait PlacementStore: Send + Sync {
    async fn save(&self, record: &PlacementRecord) -> Result<()>;

    async fn load(&self, learner: LearnerId) -> Result<Option<PlacementRecord>>;
}
