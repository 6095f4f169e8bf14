//! Range qualification state machine
//!
//! The engine owns one `Session` and drives it through
//! `AwaitingAnswer -> Advancing | Repeating -> AwaitingAnswer` until a
//! correct answer at the top tier terminates the run. Wrong answers never
//! demote and never end the run early.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::PlacementConfig;
use crate::core::error::{PlacementError, Result};
use crate::diagnostic::session::{Session, SessionSnapshot};
use crate::diagnostic::state::DiagnosticState;
use crate::placement::PlacementResult;
use crate::problems::{generate_problem, Answer, Problem, RejectReason};

/// What happened to one submitted answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Input could not be read as a number; nothing changed
    Rejected { reason: RejectReason },
    /// The answer was graded and the session moved on
    Graded {
        correct: bool,
        snapshot: SessionSnapshot,
    },
}

impl SubmitOutcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, SubmitOutcome::Graded { correct: true, .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, SubmitOutcome::Rejected { .. })
    }
}

pub struct PlacementEngine {
    config: PlacementConfig,
    session: Session,
    state: DiagnosticState,
    rng: ChaCha8Rng,
    result: Option<PlacementResult>,
    completed_this_run: bool,
}

impl PlacementEngine {
    /// Create an engine for a fresh run; fails if the config does not validate
    pub fn new(config: PlacementConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: PlacementConfig, rng: ChaCha8Rng) -> Result<Self> {
        config.validate().map_err(PlacementError::InvalidConfig)?;
        Ok(Self {
            config,
            session: Session::new(),
            state: DiagnosticState::NotStarted,
            rng,
            result: None,
            completed_this_run: false,
        })
    }

    /// Rehydrate an engine from a saved session
    pub fn resume(config: PlacementConfig, session: Session) -> Result<Self> {
        config.validate().map_err(PlacementError::InvalidConfig)?;
        let rng = match config.seed {
            // Offset so a resumed run does not replay the problems already seen
            Some(seed) => ChaCha8Rng::seed_from_u64(
                seed.wrapping_add(u64::from(session.total_attempts())),
            ),
            None => ChaCha8Rng::from_entropy(),
        };
        let result = session
            .is_terminated()
            .then(|| PlacementResult::from_session(&session, &config.support));
        let state = session.state();
        tracing::debug!(
            tier = %session.current_tier(),
            attempts = session.total_attempts(),
            ?state,
            "Resumed placement session"
        );
        Ok(Self {
            config,
            session,
            state,
            rng,
            result,
            completed_this_run: false,
        })
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> DiagnosticState {
        self.state
    }

    pub fn active_problem(&self) -> Option<&Problem> {
        self.session.active_problem()
    }

    pub fn is_terminated(&self) -> bool {
        self.state.is_terminal()
    }

    /// The final placement, available once terminated
    pub fn result(&self) -> Option<&PlacementResult> {
        self.result.as_ref()
    }

    /// Whether the run terminated through this engine rather than arriving
    /// already terminated from a saved session
    pub fn completed_this_run(&self) -> bool {
        self.completed_this_run
    }

    /// Begin the run and return the first problem
    ///
    /// Calling again before any answer returns the same problem.
    pub fn start(&mut self) -> Result<&Problem> {
        if self.state.is_terminal() {
            return Err(PlacementError::SessionTerminated);
        }
        if self.session.active_problem().is_none() {
            self.issue_problem();
            self.transition(DiagnosticState::AwaitingAnswer);
            tracing::info!("Placement diagnostic started");
        }
        self.session.active_problem().ok_or(PlacementError::NotStarted)
    }

    /// Grade a raw answer and move the state machine
    ///
    /// Unreadable input is reported as `Rejected` and leaves the session untouched.
    pub fn submit(&mut self, raw_answer: &str) -> Result<SubmitOutcome> {
        match self.state {
            DiagnosticState::NotStarted => return Err(PlacementError::NotStarted),
            DiagnosticState::Terminated => return Err(PlacementError::SessionTerminated),
            _ => {}
        }

        let submitted = match Answer::parse(raw_answer) {
            Ok(answer) => answer,
            Err(reason) => {
                tracing::debug!(?reason, "Rejected unparseable answer");
                return Ok(SubmitOutcome::Rejected { reason });
            }
        };

        let problem = self
            .session
            .active_problem()
            .ok_or(PlacementError::NotStarted)?;
        let correct = problem.is_correct(submitted, self.config.fractional_tolerance_hundredths);

        if correct {
            self.session.record_correct();
            self.transition(DiagnosticState::Advancing);
            if self.session.advance() {
                self.issue_problem();
                self.transition(DiagnosticState::AwaitingAnswer);
            } else {
                self.finish();
            }
        } else {
            self.session.record_wrong();
            self.transition(DiagnosticState::Repeating);
            self.issue_problem();
            self.transition(DiagnosticState::AwaitingAnswer);
        }

        Ok(SubmitOutcome::Graded {
            correct,
            snapshot: self.session.snapshot(),
        })
    }

    fn issue_problem(&mut self) {
        let problem = generate_problem(self.session.current_tier(), &mut self.rng, &self.config);
        self.session.set_active_problem(problem);
    }

    fn finish(&mut self) {
        self.session.terminate();
        let result = PlacementResult::from_session(&self.session, &self.config.support);
        tracing::info!(
            accuracy = result.accuracy_percent(),
            support_level = %result.support_level(),
            attempts = result.total_attempts(),
            "Placement diagnostic terminated"
        );
        self.result = Some(result);
        self.completed_this_run = true;
        self.transition(DiagnosticState::Terminated);
    }

    fn transition(&mut self, next: DiagnosticState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {:?} -> {:?}",
            self.state,
            next
        );
        tracing::debug!(
            from = ?self.state,
            to = ?next,
            tier = %self.session.current_tier(),
            "Diagnostic transition"
        );
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Tier;

    fn engine() -> PlacementEngine {
        PlacementEngine::new(PlacementConfig::default().with_seed(7)).unwrap()
    }

    fn right_answer(engine: &PlacementEngine) -> String {
        engine.active_problem().unwrap().correct_answer.to_string()
    }

    fn wrong_answer(engine: &PlacementEngine) -> String {
        let correct = engine.active_problem().unwrap().correct_answer;
        Answer::from_hundredths(correct.hundredths() + 1000).to_string()
    }

    #[test]
    fn test_submit_before_start_is_an_error() {
        let mut engine = engine();
        assert!(matches!(engine.submit("4"), Err(PlacementError::NotStarted)));
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut engine = engine();
        let first = engine.start().unwrap().clone();
        let again = engine.start().unwrap().clone();
        assert_eq!(first, again);
        assert_eq!(first.tier, Tier::MIN);
        assert_eq!(engine.state(), DiagnosticState::AwaitingAnswer);
    }

    #[test]
    fn test_correct_answer_advances() {
        let mut engine = engine();
        engine.start().unwrap();
        let outcome = engine.submit(&right_answer(&engine)).unwrap();
        assert!(outcome.is_correct());
        assert_eq!(engine.session().current_tier(), Tier::new(2).unwrap());
        assert_eq!(engine.active_problem().unwrap().tier, Tier::new(2).unwrap());
    }

    #[test]
    fn test_wrong_answer_repeats_same_tier() {
        let mut engine = engine();
        engine.start().unwrap();
        for expected_streak in 1..=5 {
            let outcome = engine.submit(&wrong_answer(&engine)).unwrap();
            match outcome {
                SubmitOutcome::Graded { correct, snapshot } => {
                    assert!(!correct);
                    assert_eq!(snapshot.current_tier, Tier::MIN);
                    assert_eq!(snapshot.consecutive_wrong_at_tier, expected_streak);
                    assert_eq!(snapshot.state, DiagnosticState::AwaitingAnswer);
                }
                SubmitOutcome::Rejected { .. } => panic!("wrong answer was rejected"),
            }
        }
        assert_eq!(engine.active_problem().unwrap().tier, Tier::MIN);
    }

    #[test]
    fn test_unparseable_input_changes_nothing() {
        let mut engine = engine();
        engine.start().unwrap();
        let before = engine.session().clone();
        let outcome = engine.submit("seven").unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Rejected {
                reason: RejectReason::NotANumber
            }
        );
        assert!(engine.submit("").unwrap().is_rejected());
        assert_eq!(engine.session(), &before);
    }

    #[test]
    fn test_terminated_engine_refuses_more_answers() {
        let mut engine = engine();
        engine.start().unwrap();
        while !engine.is_terminated() {
            let answer = right_answer(&engine);
            engine.submit(&answer).unwrap();
        }
        assert!(engine.active_problem().is_none());
        assert!(matches!(engine.submit("1"), Err(PlacementError::SessionTerminated)));
        assert!(matches!(engine.start(), Err(PlacementError::SessionTerminated)));
    }

    #[test]
    fn test_resume_continues_where_it_left_off() {
        let mut engine = engine();
        engine.start().unwrap();
        for _ in 0..3 {
            let answer = right_answer(&engine);
            engine.submit(&answer).unwrap();
        }
        let saved = serde_json::to_string(engine.session()).unwrap();

        let session: Session = serde_json::from_str(&saved).unwrap();
        let mut resumed =
            PlacementEngine::resume(PlacementConfig::default().with_seed(7), session).unwrap();
        assert_eq!(resumed.state(), DiagnosticState::AwaitingAnswer);
        assert_eq!(resumed.session().current_tier(), Tier::new(4).unwrap());
        let answer = right_answer(&resumed);
        assert!(resumed.submit(&answer).unwrap().is_correct());
        assert_eq!(resumed.session().total_attempts(), 4);
    }

    #[test]
    fn test_resume_terminated_session_rebuilds_result() {
        let mut engine = engine();
        engine.start().unwrap();
        while !engine.is_terminated() {
            let answer = right_answer(&engine);
            engine.submit(&answer).unwrap();
        }
        assert!(engine.completed_this_run());
        let resumed =
            PlacementEngine::resume(PlacementConfig::default(), engine.session().clone()).unwrap();
        assert!(resumed.is_terminated());
        assert_eq!(resumed.result(), engine.result());
        assert!(!resumed.completed_this_run());
    }

    #[test]
    fn test_resumed_run_that_finishes_counts_as_completed() {
        let mut engine = engine();
        engine.start().unwrap();
        for _ in 0..9 {
            let answer = right_answer(&engine);
            engine.submit(&answer).unwrap();
        }
        let mut resumed =
            PlacementEngine::resume(PlacementConfig::default(), engine.session().clone()).unwrap();
        assert!(!resumed.completed_this_run());
        let answer = right_answer(&resumed);
        resumed.submit(&answer).unwrap();
        assert!(resumed.is_terminated());
        assert!(resumed.completed_this_run());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let wide = PlacementConfig {
            fractional_tolerance_hundredths: 100,
            ..PlacementConfig::default()
        };
        assert!(matches!(
            PlacementEngine::new(wide),
            Err(PlacementError::InvalidConfig(_))
        ));

        let mut bad_support = PlacementConfig::default();
        bad_support.support.fallback_level = 9;
        assert!(matches!(
            PlacementEngine::resume(bad_support, Session::new()),
            Err(PlacementError::InvalidConfig(_))
        ));
    }
}
