//! Downstream gating derived from a placement result
//!
//! Content bands unlock in ladder order: the first band is always open, and
//! each later band opens once every tier before it was cleared on the first
//! try during placement.

use serde::{Deserialize, Serialize};

use crate::core::types::TierBand;
use crate::placement::result::PlacementResult;
use crate::placement::support::SupportLevel;

/// Wrong answers at one tier that earn the perseverance medal
const PERSEVERANCE_MISSES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Medal {
    /// Completed the range qualification
    RangeQualified,
    /// Every answer correct on the first try
    Marksman,
    /// Kept going after missing one tier several times in a row
    Perseverance,
}

impl Medal {
    pub fn title(self) -> &'static str {
        match self {
            Medal::RangeQualified => "Range Qualified",
            Medal::Marksman => "Marksman",
            Medal::Perseverance => "Perseverance",
        }
    }
}

/// Everything downstream content needs from a placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gating {
    pub support_level: SupportLevel,
    pub unlocked_bands: Vec<TierBand>,
    pub medals: Vec<Medal>,
}

impl Gating {
    pub fn from_result(result: &PlacementResult) -> Self {
        Self {
            support_level: result.support_level(),
            unlocked_bands: unlocked_bands(result),
            medals: medals(result),
        }
    }
}

pub fn unlocked_bands(result: &PlacementResult) -> Vec<TierBand> {
    let mut bands = vec![TierBand::WholeNumbers];
    let Some(mastered) = result.mastered_through() else {
        return bands;
    };

    for pair in TierBand::ALL.windows(2) {
        let (_, previous_top) = pair[0].tiers();
        if mastered >= previous_top {
            bands.push(pair[1]);
        } else {
            break;
        }
    }
    bands
}

pub fn medals(result: &PlacementResult) -> Vec<Medal> {
    let mut medals = vec![Medal::RangeQualified];
    if result.accuracy_percent() == 100 {
        medals.push(Medal::Marksman);
    }
    if result.max_misses_at_tier() >= PERSEVERANCE_MISSES {
        medals.push(Medal::Perseverance);
    }
    medals
}
