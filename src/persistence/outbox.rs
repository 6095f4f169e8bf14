//! Background delivery of placement records
//!
//! `enqueue` never blocks and never fails because of the store; delivery
//! happens on a tokio task that retries with linear backoff and drops the
//! record once retries are exhausted. The engine's result is already final
//! by the time it gets here, so a lost write never touches session state.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::config::OutboxConfig;
use crate::core::error::{PlacementError, Result};
use crate::persistence::{PlacementRecord, PlacementStore};

/// Delivery counts reported when the outbox shuts down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutboxStats {
    pub saved: u64,
    pub retried: u64,
    pub dropped: u64,
}

pub struct PlacementOutbox {
    sender: mpsc::UnboundedSender<PlacementRecord>,
    worker: JoinHandle<OutboxStats>,
}

impl PlacementOutbox {
    /// Start the delivery task. Must be called from within a tokio runtime.
    pub fn spawn(store: Arc<dyn PlacementStore>, config: OutboxConfig) -> Result<Self> {
        config.validate().map_err(PlacementError::InvalidConfig)?;
        let (sender, receiver) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(store, config, receiver));
        Ok(Self { sender, worker })
    }

    /// Queue a record for delivery
    pub fn enqueue(&self, record: PlacementRecord) -> Result<()> {
        tracing::debug!(learner = %record.learner, "Queued placement for persistence");
        self.sender
            .send(record)
            .map_err(|_| PlacementError::OutboxClosed)
    }

    /// Stop accepting records, deliver everything queued, and report counts
    pub async fn shutdown(self) -> Result<OutboxStats> {
        drop(self.sender);
        self.worker
            .await
            .map_err(|e| PlacementError::Persistence(format!("outbox worker failed: {}", e)))
    }
}

async fn run_worker(
    store: Arc<dyn PlacementStore>,
    config: OutboxConfig,
    mut receiver: mpsc::UnboundedReceiver<PlacementRecord>,
) -> OutboxStats {
    let mut stats = OutboxStats::default();

    while let Some(record) = receiver.recv().await {
        let mut attempt: u32 = 0;
        loop {
            match store.save(&record).await {
                Ok(()) => {
                    stats.saved += 1;
                    tracing::info!(
                        learner = %record.learner,
                        accuracy = record.result.accuracy_percent(),
                        "Persisted placement"
                    );
                    break;
                }
                Err(e) if attempt < config.max_retries => {
                    attempt += 1;
                    stats.retried += 1;
                    tracing::warn!(
                        learner = %record.learner,
                        attempt,
                        error = %e,
                        "Placement write failed, retrying"
                    );
                    let backoff = config.retry_backoff_ms.saturating_mul(u64::from(attempt));
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                }
                Err(e) => {
                    stats.dropped += 1;
                    tracing::error!(
                        learner = %record.learner,
                        error = %e,
                        "Dropping placement after {} retries",
                        config.max_retries
                    );
                    break;
                }
            }
        }
    }

    stats
}
