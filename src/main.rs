//! Gideon Placement - Entry Point
//!
//! Runs one range qualification diagnostic in the terminal and persists
//! the result to a directory of JSON records when the learner finishes.
//!
//! Environment:
//!   GIDEON_CONFIG    optional path to a placement TOML config
//!   GIDEON_DATA_DIR  where placement records are written (default ./placements)
//!   GIDEON_LEARNER   learner UUID (a new one is generated when unset)
//!   GIDEON_RESUME    optional path to a saved session to continue

use gideon_placement::core::{LearnerId, PlacementConfig, PlacementError, Result};
use gideon_placement::diagnostic::{PlacementEngine, Session, SubmitOutcome};
use gideon_placement::persistence::{JsonFileStore, PlacementOutbox, PlacementRecord};
use gideon_placement::placement::Gating;
use gideon_placement::problems::RejectReason;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gideon_placement=info")),
        )
        .init();

    let config = match std::env::var("GIDEON_CONFIG") {
        Ok(path) => PlacementConfig::load(Path::new(&path))?,
        Err(_) => PlacementConfig::default(),
    };
    let learner = match std::env::var("GIDEON_LEARNER") {
        Ok(raw) => LearnerId(
            raw.parse()
                .map_err(|e| PlacementError::InvalidConfig(format!("GIDEON_LEARNER: {}", e)))?,
        ),
        Err(_) => LearnerId::new(),
    };
    let data_dir =
        PathBuf::from(std::env::var("GIDEON_DATA_DIR").unwrap_or_else(|_| "placements".into()));

    // The runtime only backs the persistence outbox; the diagnostic itself is synchronous
    let rt = Runtime::new()?;
    let store = rt.block_on(JsonFileStore::open(&data_dir))?;
    tracing::debug!(root = %store.root().display(), "Placement store opened");
    let outbox = {
        let _guard = rt.enter();
        PlacementOutbox::spawn(Arc::new(store), config.outbox.clone())?
    };

    let mut engine = match std::env::var("GIDEON_RESUME") {
        Ok(path) => {
            let session: Session = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
            PlacementEngine::resume(config, session)?
        }
        Err(_) => PlacementEngine::new(config)?,
    };

    tracing::info!(%learner, "Gideon placement starting");

    println!("\n=== RANGE QUALIFICATION ===");
    println!("Answer each problem to climb from tier 1 to tier 10.");
    println!();
    println!("Commands:");
    println!("  status / s        - Show progress");
    println!("  save <path>       - Save the session to resume later");
    println!("  quit / q          - Abandon the run");
    println!();

    if !engine.is_terminated() {
        engine.start()?;
    }

    while !engine.is_terminated() {
        if let Some(problem) = engine.active_problem() {
            println!("[Tier {} | {}] {}", problem.tier, problem.topic_tag(), problem.question_text);
        }

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input == "quit" || input == "q" {
            break;
        }

        if input == "status" || input == "s" {
            display_status(engine.session());
            continue;
        }

        if let Some(path) = input.strip_prefix("save ") {
            let body = serde_json::to_string_pretty(engine.session())?;
            std::fs::write(path.trim(), body)?;
            println!("Session saved to {}", path.trim());
            continue;
        }

        match engine.submit(input)? {
            SubmitOutcome::Rejected { reason } => match reason {
                RejectReason::Empty => println!("Enter a number."),
                RejectReason::NotANumber => println!("'{}' is not a number. Try again.", input),
            },
            SubmitOutcome::Graded { correct: true, .. } => println!("Correct!"),
            SubmitOutcome::Graded {
                correct: false,
                snapshot,
            } => println!(
                "Not quite. Here is another tier {} problem ({} missed in a row).",
                snapshot.current_tier, snapshot.consecutive_wrong_at_tier
            ),
        }
    }

    if let Some(result) = engine.result() {
        let gating = Gating::from_result(result);
        println!();
        println!("=== QUALIFIED ===");
        println!("Final tier:     {}", result.final_tier());
        println!(
            "Accuracy:       {}% ({} of {})",
            result.accuracy_percent(),
            result.total_correct(),
            result.total_attempts()
        );
        println!("Support level:  {}", gating.support_level);
        println!(
            "Unlocked:       {}",
            gating
                .unlocked_bands
                .iter()
                .map(|band| band.name())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!(
            "Medals:         {}",
            gating
                .medals
                .iter()
                .map(|medal| medal.title())
                .collect::<Vec<_>>()
                .join(", ")
        );

        if engine.completed_this_run() {
            outbox.enqueue(PlacementRecord::new(learner, result.clone()))?;
            println!("\nPlacement saved under {}", data_dir.display());
        } else {
            println!("\nThis session was already complete; its placement is not saved again.");
        }
    } else {
        println!("\nRun abandoned at tier {}.", engine.session().current_tier());
    }

    let stats = rt.block_on(outbox.shutdown())?;
    if stats.dropped > 0 {
        tracing::warn!(dropped = stats.dropped, "Some placements were not saved");
    }
    Ok(())
}

fn display_status(session: &Session) {
    println!();
    println!(
        "--- Tier {} | {} of {} correct | {} missed at this tier ---",
        session.current_tier(),
        session.total_correct(),
        session.total_attempts(),
        session.consecutive_wrong_at_tier()
    );
    println!();
}
