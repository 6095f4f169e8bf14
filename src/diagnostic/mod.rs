//! Adaptive placement diagnostic
//!
//! A learner climbs tiers 1 through 10, repeating a tier with a fresh
//! problem until answering it correctly. Clearing tier 10 ends the run.

pub mod engine;
pub mod session;
pub mod state;

pub use engine::{PlacementEngine, SubmitOutcome};
pub use session::{Session, SessionSnapshot, TierRecord};
pub use state::DiagnosticState;
