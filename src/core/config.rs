//! Placement configuration with documented defaults
//!
//! Everything the engine treats as policy rather than mechanism lives here,
//! so a deployment can tune it from a TOML file without touching code.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{PlacementError, Result};
use crate::placement::SupportPolicy;

/// Configuration for a placement run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Whether tier 2 subtraction may produce negative differences
    ///
    /// Off by default: learners get no signal that a negative answer is
    /// expected, so operands are ordered to keep the result >= 0.
    pub allow_negative_differences: bool,

    /// Accepted distance from the correct answer on fractional tiers,
    /// in hundredths
    ///
    /// Only tiers whose answers can carry decimals (decimal shift and
    /// percent increase) use this. All other tiers compare exactly.
    pub fractional_tolerance_hundredths: u32,

    /// Accuracy bands mapped to AI support levels
    pub support: SupportPolicy,

    /// Background persistence behaviour
    pub outbox: OutboxConfig,

    /// Seed for deterministic problem generation (random when unset)
    pub seed: Option<u64>,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            allow_negative_differences: false,
            fractional_tolerance_hundredths: 1,
            support: SupportPolicy::default(),
            outbox: OutboxConfig::default(),
            seed: None,
        }
    }
}

/// Retry policy for the persistence outbox
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutboxConfig {
    /// Attempts after the first failed write before a record is dropped
    pub max_retries: u32,

    /// Delay before retry n is n * retry_backoff_ms
    pub retry_backoff_ms: u64,
}

impl Default for OutboxConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_backoff_ms: 250,
        }
    }
}

impl OutboxConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_retries > 20 {
            return Err(format!(
                "outbox.max_retries ({}) should be <= 20",
                self.max_retries
            ));
        }
        Ok(())
    }
}

impl PlacementConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PlacementConfig = toml::from_str(content)?;
        config.validate().map_err(PlacementError::InvalidConfig)?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        // A tolerance of a whole unit or more would accept neighbouring answers
        if self.fractional_tolerance_hundredths >= 100 {
            return Err(format!(
                "fractional_tolerance_hundredths ({}) must be < 100",
                self.fractional_tolerance_hundredths
            ));
        }

        self.outbox.validate()?;
        self.support.validate()
    }
}
