//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::core::error::PlacementError;

/// Opaque learner identifier, the key placement results are stored under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LearnerId(pub Uuid);

impl LearnerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LearnerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LearnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One rung of the difficulty ladder, always within 1..=10
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Tier(u8);

impl Tier {
    pub const MIN: Tier = Tier(1);
    pub const MAX: Tier = Tier(10);

    pub fn new(value: u8) -> Result<Self, PlacementError> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(PlacementError::TierOutOfRange(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// The next rung, or None when this is the top of the ladder
    pub fn next(self) -> Option<Tier> {
        if self == Self::MAX {
            None
        } else {
            Some(Tier(self.0 + 1))
        }
    }

    pub fn is_max(self) -> bool {
        self == Self::MAX
    }

    pub fn band(self) -> TierBand {
        match self.0 {
            1..=2 => TierBand::WholeNumbers,
            3..=5 => TierBand::DecimalsFractions,
            6..=8 => TierBand::PercentsRatios,
            _ => TierBand::Algebra,
        }
    }

    /// Every tier in ladder order
    pub fn all() -> impl Iterator<Item = Tier> {
        (Self::MIN.0..=Self::MAX.0).map(Tier)
    }
}

impl TryFrom<u8> for Tier {
    type Error = PlacementError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Tier::new(value)
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> u8 {
        tier.0
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Topic band a tier belongs to (fixed, non-overlapping ranges)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierBand {
    WholeNumbers,
    DecimalsFractions,
    PercentsRatios,
    Algebra,
}

impl TierBand {
    pub const ALL: [TierBand; 4] = [
        TierBand::WholeNumbers,
        TierBand::DecimalsFractions,
        TierBand::PercentsRatios,
        TierBand::Algebra,
    ];

    /// Inclusive tier range covered by this band
    pub fn tiers(self) -> (Tier, Tier) {
        match self {
            TierBand::WholeNumbers => (Tier(1), Tier(2)),
            TierBand::DecimalsFractions => (Tier(3), Tier(5)),
            TierBand::PercentsRatios => (Tier(6), Tier(8)),
            TierBand::Algebra => (Tier(9), Tier(10)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TierBand::WholeNumbers => "Whole Numbers",
            TierBand::DecimalsFractions => "Decimals & Fractions",
            TierBand::PercentsRatios => "Percents & Ratios",
            TierBand::Algebra => "Algebra",
        }
    }
}
