//! Placement results derived once a diagnostic terminates

use serde::{Deserialize, Serialize};

use crate::core::types::Tier;
use crate::diagnostic::Session;
use crate::placement::support::{SupportLevel, SupportPolicy};

/// `round(100 * correct / attempts)` with halves rounding up, 0 when nothing was attempted
pub fn accuracy_percent(total_correct: u32, total_attempts: u32) -> u8 {
    if total_attempts == 0 {
        return 0;
    }
    let correct = u64::from(total_correct.min(total_attempts));
    let attempts = u64::from(total_attempts);
    ((200 * correct + attempts) / (2 * attempts)) as u8
}

/// Outcome of a finished placement run. Fields are read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementResult {
    final_tier: Tier,
    accuracy_percent: u8,
    support_level: SupportLevel,
    total_attempts: u32,
    total_correct: u32,
    mastered_through: Option<Tier>,
    max_misses_at_tier: u32,
}

impl PlacementResult {
    pub fn from_session(session: &Session, policy: &SupportPolicy) -> Self {
        let accuracy = accuracy_percent(session.total_correct(), session.total_attempts());
        Self {
            final_tier: session.current_tier(),
            accuracy_percent: accuracy,
            support_level: policy.level_for(accuracy),
            total_attempts: session.total_attempts(),
            total_correct: session.total_correct(),
            mastered_through: session.mastered_through(),
            max_misses_at_tier: session.max_misses_at_tier(),
        }
    }

    pub fn final_tier(&self) -> Tier {
        self.final_tier
    }

    pub fn accuracy_percent(&self) -> u8 {
        self.accuracy_percent
    }

    pub fn support_level(&self) -> SupportLevel {
        self.support_level
    }

    pub fn total_attempts(&self) -> u32 {
        self.total_attempts
    }

    pub fn total_correct(&self) -> u32 {
        self.total_correct
    }

    /// Highest tier T where every tier 1..=T was cleared on the first try
    pub fn mastered_through(&self) -> Option<Tier> {
        self.mastered_through
    }

    /// Most wrong answers given at any single tier
    pub fn max_misses_at_tier(&self) -> u32 {
        self.max_misses_at_tier
    }
}
