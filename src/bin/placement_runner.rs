//! Headless Placement Runner
//!
//! Drives the placement engine with a simulated learner and prints one
//! summary per run, for tuning support bands against accuracy profiles.

use clap::Parser;
use gideon_placement::core::{LearnerId, PlacementConfig};
use gideon_placement::diagnostic::PlacementEngine;
use gideon_placement::persistence::{MemoryStore, PlacementOutbox, PlacementRecord};
use gideon_placement::placement::Gating;
use gideon_placement::problems::Answer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Headless Placement Runner - simulated learners through range qualification
#[derive(Parser, Debug)]
#[command(name = "placement_runner")]
#[command(about = "Run simulated placement diagnostics and output summaries")]
struct Args {
    /// Probability that the simulated learner answers any problem correctly
    #[arg(long, default_value_t = 0.8)]
    skill: f64,

    /// Number of placement runs
    #[arg(long, default_value_t = 1)]
    runs: u32,

    /// Give up on a run after this many submissions
    #[arg(long, default_value_t = 10_000)]
    max_submissions: u32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Placement config TOML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Enable debug logging of every transition
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct RunSummary {
    run: u32,
    seed: u64,
    completed: bool,
    submissions: u32,
    accuracy_percent: Option<u8>,
    support_level: Option<u8>,
    mastered_through: Option<u8>,
    unlocked_bands: Vec<String>,
    medals: Vec<String>,
}

fn main() {
    let args = Args::parse();

    let filter = if args.verbose {
        "gideon_placement=debug"
    } else {
        "gideon_placement=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if !(0.0..=1.0).contains(&args.skill) || args.skill == 0.0 {
        eprintln!("--skill must be in (0, 1]");
        std::process::exit(2);
    }

    let base_config = match &args.config {
        Some(path) => PlacementConfig::load(path).unwrap_or_else(|e| {
            eprintln!("Failed to load config {}: {}", path.display(), e);
            std::process::exit(2);
        }),
        None => PlacementConfig::default(),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut learner_rng = StdRng::seed_from_u64(seed);

    let rt = Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to start runtime: {}", e);
        std::process::exit(1);
    });
    let store = Arc::new(MemoryStore::new());
    let outbox = {
        let _guard = rt.enter();
        PlacementOutbox::spawn(store.clone(), base_config.outbox.clone()).unwrap_or_else(|e| {
            eprintln!("Failed to start outbox: {}", e);
            std::process::exit(2);
        })
    };

    for run in 0..args.runs {
        let run_seed = seed.wrapping_add(u64::from(run));
        let config = base_config.clone().with_seed(run_seed);
        let mut engine = match PlacementEngine::new(config) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("Run {} has an invalid config: {}", run, e);
                std::process::exit(2);
            }
        };
        if let Err(e) = engine.start() {
            eprintln!("Run {} failed to start: {}", run, e);
            continue;
        }

        let mut submissions = 0;
        while !engine.is_terminated() && submissions < args.max_submissions {
            let Some(problem) = engine.active_problem() else {
                break;
            };
            let answer = if learner_rng.gen_bool(args.skill) {
                problem.correct_answer
            } else {
                Answer::from_hundredths(problem.correct_answer.hundredths() + 100)
            };
            match engine.submit(&answer.to_string()) {
                Ok(_) => submissions += 1,
                Err(e) => {
                    eprintln!("Run {} aborted: {}", run, e);
                    break;
                }
            }
        }

        let summary = match engine.result() {
            Some(result) => {
                let gating = Gating::from_result(result);
                if let Err(e) = outbox.enqueue(PlacementRecord::new(LearnerId::new(), result.clone())) {
                    eprintln!("Run {}: {}", run, e);
                }
                RunSummary {
                    run,
                    seed: run_seed,
                    completed: true,
                    submissions,
                    accuracy_percent: Some(result.accuracy_percent()),
                    support_level: Some(result.support_level().value()),
                    mastered_through: result.mastered_through().map(|tier| tier.value()),
                    unlocked_bands: gating
                        .unlocked_bands
                        .iter()
                        .map(|band| band.name().to_string())
                        .collect(),
                    medals: gating
                        .medals
                        .iter()
                        .map(|medal| medal.title().to_string())
                        .collect(),
                }
            }
            None => RunSummary {
                run,
                seed: run_seed,
                completed: false,
                submissions,
                accuracy_percent: None,
                support_level: None,
                mastered_through: None,
                unlocked_bands: Vec::new(),
                medals: Vec::new(),
            },
        };

        print_summary(&summary, &args.format);
    }

    match rt.block_on(outbox.shutdown()) {
        Ok(stats) => {
            let stored = rt.block_on(store.len());
            tracing::info!(saved = stats.saved, stored, "Runner finished");
        }
        Err(e) => eprintln!("Outbox shutdown failed: {}", e),
    }
}

fn print_summary(summary: &RunSummary, format: &str) {
    if format == "json" {
        match serde_json::to_string(summary) {
            Ok(line) => println!("{}", line),
            Err(e) => eprintln!("Failed to encode summary: {}", e),
        }
        return;
    }

    if summary.completed {
        println!(
            "run {:>3}: {} submissions, accuracy {}%, support level {}, medals [{}]",
            summary.run,
            summary.submissions,
            summary.accuracy_percent.unwrap_or(0),
            summary.support_level.unwrap_or(0),
            summary.medals.join(", ")
        );
    } else {
        println!(
            "run {:>3}: incomplete after {} submissions",
            summary.run, summary.submissions
        );
    }
}
