//! Placement results and the gating values derived from them

pub mod gating;
pub mod result;
pub mod support;

pub use gating::{medals, unlocked_bands, Gating, Medal};
pub use result::{accuracy_percent, PlacementResult};
pub use support::{SupportBand, SupportLevel, SupportPolicy};
