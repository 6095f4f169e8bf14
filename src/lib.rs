//! Gideon Placement - adaptive range qualification for GED math
//!
//! A learner climbs a ten-tier ladder of arithmetic and algebra problems.
//! Wrong answers repeat the tier with a fresh problem; a correct answer at
//! tier 10 ends the run and yields a [`placement::PlacementResult`] that
//! downstream content gates on.

pub mod core;
pub mod diagnostic;
pub mod persistence;
pub mod placement;
pub mod problems;

pub use crate::core::{LearnerId, PlacementConfig, PlacementError, Result, Tier, TierBand};
pub use diagnostic::{DiagnosticState, PlacementEngine, Session, SubmitOutcome};
pub use placement::{Gating, Medal, PlacementResult, SupportLevel};
pub use problems::{Answer, Problem, Topic};
