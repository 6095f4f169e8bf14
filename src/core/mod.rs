pub mod config;
pub mod error;
pub mod types;

pub use config::{OutboxConfig, PlacementConfig};
pub use error::{PlacementError, Result};
pub use types::{LearnerId, Tier, TierBand};
