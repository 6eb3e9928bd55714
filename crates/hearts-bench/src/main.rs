use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use hearts_bench::config::{BenchmarkConfig, ResolvedOutputs};
use hearts_bench::logging::init_logging;
use hearts_bench::tournament::TournamentRunner;

/// Tournament benchmarking harness for Hearts bots.
#[derive(Debug, Parser)]
#[command(
    name = "hearts-bench",
    author,
    version,
    about = "Deterministic Hearts tournament harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of games to play.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the RNG seed for game generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the number of seat permutations per game.
    #[arg(long, value_name = "COUNT")]
    permutations: Option<usize>,

    /// Exit after validating the configuration (no tournament is run).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(games) = cli.games {
        config.games.count = games;
    }

    if let Some(seed) = cli.seed {
        config.games.seed = Some(seed);
    }

    if let Some(permutations) = cli.permutations {
        config.games.permutations = permutations;
    }

    config.validate().context("validating overridden configuration")?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let games = config.games.count;
    let permutations = config.games.permutations;

    println!(
        "Loaded configuration '{run_id}' with {} agents ({games} games, {permutations} permutations)",
        config.agents.len()
    );

    if cli.validate_only {
        println!("Validation-only mode: tournament execution skipped.");
        return Ok(());
    }

    let logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = TournamentRunner::new(config, outputs)?;
    let summary = runner.run()?;
    println!(
        "Tournament complete for '{run_id}': {} games × {} permutations → {} rows at {}",
        summary.games_played,
        summary.permutations,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}
