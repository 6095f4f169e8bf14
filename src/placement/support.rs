//! AI support levels and the accuracy bands that assign them

use serde::{Deserialize, Serialize};
use std::fmt;

/// How much scaffolding downstream content provides, 1 (independent) to 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SupportLevel(u8);

impl SupportLevel {
    pub const MOST_INDEPENDENT: SupportLevel = SupportLevel(1);
    pub const MOST_SUPPORT: SupportLevel = SupportLevel(5);

    pub fn new(level: u8) -> Option<Self> {
        (1..=5).contains(&level).then_some(Self(level))
    }

    /// Nearest valid level
    pub fn clamped(level: u8) -> Self {
        Self(level.clamp(1, 5))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for SupportLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        SupportLevel::new(value).ok_or_else(|| format!("support level {} not in 1..=5", value))
    }
}

impl From<SupportLevel> for u8 {
    fn from(level: SupportLevel) -> u8 {
        level.0
    }
}

impl fmt::Display for SupportLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Accuracy at or above `min_accuracy` earns `level`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportBand {
    pub min_accuracy: u8,
    pub level: u8,
}

/// Maps placement accuracy to a support level
///
/// Bands are checked highest threshold first; accuracy below every band
/// falls back to `fallback_level`. The default is the binary rule: 80% or
/// better gets level 1, everything else level 5. Levels 2-4 are only
/// reachable by configuring extra bands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportPolicy {
    pub bands: Vec<SupportBand>,
    pub fallback_level: u8,
}

impl Default for SupportPolicy {
    fn default() -> Self {
        Self {
            bands: vec![SupportBand {
                min_accuracy: 80,
                level: SupportLevel::MOST_INDEPENDENT.value(),
            }],
            fallback_level: SupportLevel::MOST_SUPPORT.value(),
        }
    }
}

impl SupportPolicy {
    pub fn level_for(&self, accuracy_percent: u8) -> SupportLevel {
        let level = self
            .bands
            .iter()
            .find(|band| accuracy_percent >= band.min_accuracy)
            .map_or(self.fallback_level, |band| band.level);
        SupportLevel::clamped(level)
    }

    pub fn validate(&self) -> Result<(), String> {
        if SupportLevel::new(self.fallback_level).is_none() {
            return Err(format!(
                "support.fallback_level ({}) must be in 1..=5",
                self.fallback_level
            ));
        }

        for band in &self.bands {
            if band.min_accuracy > 100 {
                return Err(format!(
                    "support band min_accuracy ({}) must be <= 100",
                    band.min_accuracy
                ));
            }
            if SupportLevel::new(band.level).is_none() {
                return Err(format!("support band level ({}) must be in 1..=5", band.level));
            }
        }

        // Thresholds must be strictly descending so the first match is the best band
        if let Some(pair) = self
            .bands
            .windows(2)
            .find(|pair| pair[0].min_accuracy <= pair[1].min_accuracy)
        {
            return Err(format!(
                "support bands must be in descending order of min_accuracy ({} then {})",
                pair[0].min_accuracy, pair[1].min_accuracy
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_binary_cliff() {
        let policy = SupportPolicy::default();
        assert_eq!(policy.level_for(100).value(), 1);
        assert_eq!(policy.level_for(80).value(), 1);
        assert_eq!(policy.level_for(79).value(), 5);
        assert_eq!(policy.level_for(0).value(), 5);
        assert_eq!(policy.level_for(100), SupportLevel::MOST_INDEPENDENT);
        assert_eq!(policy.level_for(0), SupportLevel::MOST_SUPPORT);
    }

    #[test]
    fn test_graded_bands() {
        let policy = SupportPolicy {
            bands: vec![
                SupportBand { min_accuracy: 80, level: 1 },
                SupportBand { min_accuracy: 60, level: 3 },
            ],
            fallback_level: 5,
        };
        assert!(policy.validate().is_ok());
        assert_eq!(policy.level_for(85).value(), 1);
        assert_eq!(policy.level_for(60).value(), 3);
        assert_eq!(policy.level_for(59).value(), 5);
    }

    #[test]
    fn test_validate_rejects_bad_policies() {
        let unordered = SupportPolicy {
            bands: vec![
                SupportBand { min_accuracy: 60, level: 3 },
                SupportBand { min_accuracy: 80, level: 1 },
            ],
            fallback_level: 5,
        };
        assert!(unordered.validate().is_err());

        let bad_level = SupportPolicy {
            bands: vec![SupportBand { min_accuracy: 80, level: 6 }],
            fallback_level: 5,
        };
        assert!(bad_level.validate().is_err());

        let bad_fallback = SupportPolicy {
            bands: vec![],
            fallback_level: 0,
        };
        assert!(bad_fallback.validate().is_err());
    }

    #[test]
    fn test_support_level_serde_bounds() {
        assert!(serde_json::from_str::<SupportLevel>("3").is_ok());
        assert!(serde_json::from_str::<SupportLevel>("0").is_err());
        assert!(serde_json::from_str::<SupportLevel>("6").is_err());
    }
}
