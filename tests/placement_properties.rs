//! Property tests for the placement state machine

use gideon_placement::core::{PlacementConfig, Tier};
use gideon_placement::diagnostic::{PlacementEngine, SubmitOutcome};
use gideon_placement::placement::{accuracy_percent, SupportPolicy};
use gideon_placement::problems::{generate_problem, Answer};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// One learner action: a correct answer, a wrong answer, or junk input
#[derive(Debug, Clone, Copy)]
enum Action {
    Right,
    Wrong,
    Junk,
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => Just(Action::Right),
        2 => Just(Action::Wrong),
        1 => Just(Action::Junk),
    ]
}

fn apply(engine: &mut PlacementEngine, action: Action) -> SubmitOutcome {
    let correct = engine.active_problem().unwrap().correct_answer;
    let raw = match action {
        Action::Right => correct.to_string(),
        Action::Wrong => Answer::from_hundredths(correct.hundredths() - 300).to_string(),
        Action::Junk => "not a number".to_string(),
    };
    engine.submit(&raw).unwrap()
}

proptest! {
    /// Tier never drops, attempts never trail correct answers, and each
    /// graded submit adds exactly one attempt
    #[test]
    fn test_session_invariants_hold(
        seed in any::<u64>(),
        actions in prop::collection::vec(action_strategy(), 1..120),
    ) {
        let mut engine = PlacementEngine::new(PlacementConfig::default().with_seed(seed)).unwrap();
        engine.start().unwrap();

        for action in actions {
            if engine.is_terminated() {
                break;
            }
            let tier_before = engine.session().current_tier();
            let attempts_before = engine.session().total_attempts();
            let outcome = apply(&mut engine, action);
            let session = engine.session();

            prop_assert!(session.current_tier() >= tier_before);
            prop_assert!(session.total_attempts() >= session.total_correct());
            match outcome {
                SubmitOutcome::Rejected { .. } => {
                    prop_assert_eq!(session.total_attempts(), attempts_before);
                    prop_assert_eq!(session.current_tier(), tier_before);
                }
                SubmitOutcome::Graded { correct, .. } => {
                    prop_assert_eq!(session.total_attempts(), attempts_before + 1);
                    if !correct {
                        prop_assert_eq!(session.current_tier(), tier_before);
                    }
                }
            }
        }
    }

    /// Termination happens exactly on a correct tier-10 answer
    #[test]
    fn test_termination_only_from_tier_ten(
        seed in any::<u64>(),
        actions in prop::collection::vec(action_strategy(), 1..200),
    ) {
        let mut engine = PlacementEngine::new(PlacementConfig::default().with_seed(seed)).unwrap();
        engine.start().unwrap();

        for action in actions {
            if engine.is_terminated() {
                break;
            }
            let at_top = engine.session().current_tier() == Tier::MAX;
            let outcome = apply(&mut engine, action);
            prop_assert_eq!(engine.is_terminated(), at_top && outcome.is_correct());
            prop_assert_eq!(engine.result().is_some(), engine.is_terminated());
        }

        if let Some(result) = engine.result() {
            let session = engine.session();
            prop_assert_eq!(result.total_correct(), 10);
            prop_assert_eq!(
                result.accuracy_percent(),
                accuracy_percent(session.total_correct(), session.total_attempts())
            );
            prop_assert!(result.accuracy_percent() <= 100);
        }
    }

    /// Accuracy stays in range and matches the rounded ratio
    #[test]
    fn test_accuracy_formula(attempts in 1u32..10_000, correct_frac in 0.0f64..=1.0) {
        let correct = ((f64::from(attempts) * correct_frac).floor() as u32).min(attempts);
        let pct = accuracy_percent(correct, attempts);
        prop_assert!(pct <= 100);
        let exact = 100.0 * f64::from(correct) / f64::from(attempts);
        prop_assert!((f64::from(pct) - exact).abs() <= 0.5 + 1e-9);
    }

    /// Default support is 1 at or above 80% and 5 below
    #[test]
    fn test_default_support_cliff(accuracy in 0u8..=100) {
        let level = SupportPolicy::default().level_for(accuracy).value();
        prop_assert_eq!(level, if accuracy >= 80 { 1 } else { 5 });
    }

    /// Every generated problem matches its tier and, outside fractional
    /// topics, has a whole-number answer
    #[test]
    fn test_generated_answers_are_well_formed(seed in any::<u64>(), tier in 1u8..=10) {
        let tier = Tier::new(tier).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let problem = generate_problem(tier, &mut rng, &PlacementConfig::default());
        prop_assert_eq!(problem.tier, tier);
        if !problem.topic.is_fractional() {
            prop_assert!(problem.correct_answer.is_whole());
        }
        // Printed answers read back to the same value
        prop_assert_eq!(Answer::parse(&problem.correct_answer.to_string()), Ok(problem.correct_answer));
    }
}
