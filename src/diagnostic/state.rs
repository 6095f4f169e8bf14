use serde::{Deserialize, Serialize};

/// Where the diagnostic state machine currently is
///
/// `Advancing` and `Repeating` are transient: they are entered and left
/// within a single submission and never observed between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticState {
    NotStarted,
    AwaitingAnswer,
    Advancing,
    Repeating,
    Terminated,
}

impl DiagnosticState {
    /// Whether `next` is a legal successor of this state
    pub fn can_transition_to(self, next: DiagnosticState) -> bool {
        use DiagnosticState::*;
        matches!(
            (self, next),
            (NotStarted, AwaitingAnswer)
                | (AwaitingAnswer, Advancing)
                | (AwaitingAnswer, Repeating)
                | (Advancing, AwaitingAnswer)
                | (Advancing, Terminated)
                | (Repeating, AwaitingAnswer)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == DiagnosticState::Terminated
    }
}
