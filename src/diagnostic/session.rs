//! Mutable state of one diagnostic run
//!
//! Counters only move through the recording methods, which keep the
//! invariants in one place: the tier never drops, attempts never trail
//! correct answers, and a terminated session never changes again.

use serde::{Deserialize, Serialize};

use crate::core::error::PlacementError;
use crate::core::types::Tier;
use crate::diagnostic::state::DiagnosticState;
use crate::problems::Problem;

/// Attempts and correct answers seen at one tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierRecord {
    pub attempts: u32,
    pub correct: u32,
}

impl TierRecord {
    pub fn misses(&self) -> u32 {
        self.attempts.saturating_sub(self.correct)
    }

    pub fn cleared_first_try(&self) -> bool {
        self.attempts == 1 && self.correct == 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SessionRepr")]
pub struct Session {
    current_tier: Tier,
    consecutive_wrong_at_tier: u32,
    total_attempts: u32,
    total_correct: u32,
    active_problem: Option<Problem>,
    terminated: bool,
    tier_log: Vec<TierRecord>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            current_tier: Tier::MIN,
            consecutive_wrong_at_tier: 0,
            total_attempts: 0,
            total_correct: 0,
            active_problem: None,
            terminated: false,
            tier_log: vec![TierRecord::default(); usize::from(Tier::MAX.value())],
        }
    }

    pub fn current_tier(&self) -> Tier {
        self.current_tier
    }

    pub fn consecutive_wrong_at_tier(&self) -> u32 {
        self.consecutive_wrong_at_tier
    }

    pub fn total_attempts(&self) -> u32 {
        self.total_attempts
    }

    pub fn total_correct(&self) -> u32 {
        self.total_correct
    }

    pub fn active_problem(&self) -> Option<&Problem> {
        self.active_problem.as_ref()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn tier_record(&self, tier: Tier) -> TierRecord {
        self.tier_log
            .get(usize::from(tier.value() - 1))
            .copied()
            .unwrap_or_default()
    }

    /// Resting state implied by the stored fields
    pub fn state(&self) -> DiagnosticState {
        if self.terminated {
            DiagnosticState::Terminated
        } else if self.active_problem.is_some() {
            DiagnosticState::AwaitingAnswer
        } else {
            DiagnosticState::NotStarted
        }
    }

    /// Highest tier T where tiers 1..=T were all cleared on the first try
    pub fn mastered_through(&self) -> Option<Tier> {
        Tier::all()
            .take_while(|tier| self.tier_record(*tier).cleared_first_try())
            .last()
    }

    pub fn max_misses_at_tier(&self) -> u32 {
        self.tier_log.iter().map(TierRecord::misses).max().unwrap_or(0)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state(),
            current_tier: self.current_tier,
            consecutive_wrong_at_tier: self.consecutive_wrong_at_tier,
            total_attempts: self.total_attempts,
            total_correct: self.total_correct,
        }
    }

    pub(crate) fn set_active_problem(&mut self, problem: Problem) {
        debug_assert!(!self.terminated);
        debug_assert_eq!(problem.tier, self.current_tier);
        self.active_problem = Some(problem);
    }

    pub(crate) fn record_correct(&mut self) {
        self.total_attempts += 1;
        self.total_correct += 1;
        self.consecutive_wrong_at_tier = 0;
        let record = self.record_mut();
        record.attempts += 1;
        record.correct += 1;
    }

    pub(crate) fn record_wrong(&mut self) {
        self.total_attempts += 1;
        self.consecutive_wrong_at_tier += 1;
        self.record_mut().attempts += 1;
    }

    /// Move up one rung; returns false when already at the top
    pub(crate) fn advance(&mut self) -> bool {
        match self.current_tier.next() {
            Some(next) => {
                self.current_tier = next;
                self.consecutive_wrong_at_tier = 0;
                self.active_problem = None;
                true
            }
            None => false,
        }
    }

    pub(crate) fn terminate(&mut self) {
        self.terminated = true;
        self.active_problem = None;
    }

    fn record_mut(&mut self) -> &mut TierRecord {
        let index = usize::from(self.current_tier.value() - 1);
        &mut self.tier_log[index]
    }
}

/// Wire shape of a saved session, checked before it becomes a `Session`
#[derive(Deserialize)]
struct SessionRepr {
    current_tier: Tier,
    consecutive_wrong_at_tier: u32,
    total_attempts: u32,
    total_correct: u32,
    active_problem: Option<Problem>,
    terminated: bool,
    tier_log: Vec<TierRecord>,
}

impl TryFrom<SessionRepr> for Session {
    type Error = PlacementError;

    fn try_from(repr: SessionRepr) -> Result<Self, Self::Error> {
        let invalid = |msg: String| Err(PlacementError::InvalidSession(msg));

        if repr.tier_log.len() != usize::from(Tier::MAX.value()) {
            return invalid(format!(
                "tier_log has {} entries, expected {}",
                repr.tier_log.len(),
                Tier::MAX
            ));
        }
        if let Some((i, record)) = repr
            .tier_log
            .iter()
            .enumerate()
            .find(|(_, record)| record.correct > record.attempts || record.correct > 1)
        {
            return invalid(format!(
                "tier {} records {} correct of {} attempts",
                i + 1,
                record.correct,
                record.attempts
            ));
        }
        if repr.total_correct > repr.total_attempts {
            return invalid(format!(
                "total_correct ({}) exceeds total_attempts ({})",
                repr.total_correct, repr.total_attempts
            ));
        }

        let logged_attempts: u64 = repr.tier_log.iter().map(|r| u64::from(r.attempts)).sum();
        let logged_correct: u64 = repr.tier_log.iter().map(|r| u64::from(r.correct)).sum();
        if logged_attempts != u64::from(repr.total_attempts)
            || logged_correct != u64::from(repr.total_correct)
        {
            return invalid(format!(
                "totals {}/{} disagree with tier_log {}/{}",
                repr.total_correct, repr.total_attempts, logged_correct, logged_attempts
            ));
        }

        // Every tier below the current one was cleared exactly once
        let cleared_below = u64::from(repr.current_tier.value() - 1);
        let expected_correct = cleared_below + u64::from(repr.terminated);
        if logged_correct != expected_correct {
            return invalid(format!(
                "tier {} with {} correct answers is not reachable",
                repr.current_tier, logged_correct
            ));
        }

        if let Some(problem) = &repr.active_problem {
            if problem.tier != repr.current_tier {
                return invalid(format!(
                    "active problem is tier {} but session is at tier {}",
                    problem.tier, repr.current_tier
                ));
            }
        }
        if repr.terminated && (!repr.current_tier.is_max() || repr.active_problem.is_some()) {
            return invalid("terminated session must sit at the top tier with no problem".into());
        }

        Ok(Self {
            current_tier: repr.current_tier,
            consecutive_wrong_at_tier: repr.consecutive_wrong_at_tier,
            total_attempts: repr.total_attempts,
            total_correct: repr.total_correct,
            active_problem: repr.active_problem,
            terminated: repr.terminated,
            tier_log: repr.tier_log,
        })
    }
}

/// Counters reported back after every graded submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: DiagnosticState,
    pub current_tier: Tier,
    pub consecutive_wrong_at_tier: u32,
    pub total_attempts: u32,
    pub total_correct: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::Answer;

    #[test]
    fn test_new_session_starts_at_tier_one() {
        let session = Session::new();
        assert_eq!(session.current_tier(), Tier::MIN);
        assert_eq!(session.total_attempts(), 0);
        assert_eq!(session.state(), DiagnosticState::NotStarted);
        assert_eq!(session.mastered_through(), None);
    }

    #[test]
    fn test_wrong_answers_track_streak() {
        let mut session = Session::new();
        session.record_wrong();
        session.record_wrong();
        assert_eq!(session.consecutive_wrong_at_tier(), 2);
        assert_eq!(session.total_attempts(), 2);
        assert_eq!(session.total_correct(), 0);

        session.record_correct();
        assert_eq!(session.consecutive_wrong_at_tier(), 0);
        assert_eq!(session.tier_record(Tier::MIN), TierRecord { attempts: 3, correct: 1 });
        assert_eq!(session.max_misses_at_tier(), 2);
    }

    #[test]
    fn test_advance_stops_at_top() {
        let mut session = Session::new();
        for _ in 1..10 {
            assert!(session.advance());
        }
        assert_eq!(session.current_tier(), Tier::MAX);
        assert!(!session.advance());
        assert_eq!(session.current_tier(), Tier::MAX);
    }

    #[test]
    fn test_mastery_streak_breaks_on_first_miss() {
        let mut session = Session::new();
        session.record_correct();
        session.advance();
        session.record_correct();
        session.advance();
        session.record_wrong();
        session.record_correct();
        session.advance();
        session.record_correct();
        assert_eq!(session.mastered_through(), Tier::new(2).ok());
    }

    #[test]
    fn test_session_serde_roundtrip_keeps_progress() {
        let mut session = Session::new();
        session.record_wrong();
        session.record_correct();
        session.advance();
        let json = serde_json::to_string(&session).unwrap();
        let restored: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, session);
    }

    /// Serialize a session at tier 2 with one miss, let `edit` corrupt it,
    /// and try to read it back
    fn reload_edited(edit: impl FnOnce(&mut serde_json::Value)) -> serde_json::Result<Session> {
        let mut session = Session::new();
        session.record_correct();
        session.advance();
        session.record_wrong();
        let mut value = serde_json::to_value(&session).unwrap();
        edit(&mut value);
        serde_json::from_value(value)
    }

    #[test]
    fn test_untouched_saved_session_loads() {
        assert!(reload_edited(|_| {}).is_ok());
    }

    #[test]
    fn test_rejects_short_tier_log() {
        let err = reload_edited(|v| v["tier_log"] = serde_json::json!([])).unwrap_err();
        assert!(err.to_string().contains("tier_log"), "{}", err);
    }

    #[test]
    fn test_rejects_record_with_more_correct_than_attempts() {
        let err = reload_edited(|v| {
            v["tier_log"][0] = serde_json::json!({ "attempts": 0, "correct": 1 });
            v["total_attempts"] = serde_json::json!(1);
        })
        .unwrap_err();
        assert!(err.to_string().contains("correct of"), "{}", err);
    }

    #[test]
    fn test_rejects_totals_out_of_order() {
        let err = reload_edited(|v| v["total_correct"] = serde_json::json!(5)).unwrap_err();
        assert!(err.to_string().contains("exceeds"), "{}", err);
    }

    #[test]
    fn test_rejects_totals_that_disagree_with_log() {
        let err = reload_edited(|v| v["total_attempts"] = serde_json::json!(7)).unwrap_err();
        assert!(err.to_string().contains("disagree"), "{}", err);
    }

    #[test]
    fn test_rejects_unreachable_tier() {
        let err = reload_edited(|v| v["current_tier"] = serde_json::json!(6)).unwrap_err();
        assert!(err.to_string().contains("not reachable"), "{}", err);
    }

    #[test]
    fn test_rejects_problem_from_another_tier() {
        let problem = Problem::new(
            Tier::new(7).unwrap(),
            "The ratio of red to blue is 1:1. There are 2 red. How many in total?",
            Answer::whole(4),
        );
        let err = reload_edited(|v| {
            v["active_problem"] = serde_json::to_value(&problem).unwrap();
        })
        .unwrap_err();
        assert!(err.to_string().contains("active problem"), "{}", err);
    }

    #[test]
    fn test_rejects_terminated_below_top_tier() {
        let err = reload_edited(|v| {
            v["terminated"] = serde_json::json!(true);
            v["tier_log"][1] = serde_json::json!({ "attempts": 2, "correct": 1 });
            v["total_correct"] = serde_json::json!(2);
            v["total_attempts"] = serde_json::json!(3);
        })
        .unwrap_err();
        assert!(err.to_string().contains("terminated"), "{}", err);
    }

    #[test]
    fn test_misses_never_underflow() {
        let record = TierRecord { attempts: 0, correct: 1 };
        assert_eq!(record.misses(), 0);
    }
}
