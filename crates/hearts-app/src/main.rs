#![deny(warnings)]

mod terminal;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::{EnvFilter, fmt};

use hearts_app::command::{Command, CommandError, HELP};
use hearts_app::runner::{GameRunner, HUMAN_SEAT};
use hearts_app::session::SessionSnapshot;
use hearts_bot::policy::Difficulty;
use hearts_core::game::state::Phase;

use terminal::{TerminalEvents, announce_result, render};

/// Play Hearts against three computer opponents in the terminal.
#[derive(Debug, Parser)]
#[command(name = "hearts", author, version, about = "Four-player Hearts in the terminal")]
struct Cli {
    /// Opponent strength: easy, medium, hard, harder or hardest.
    #[arg(short, long, default_value = "medium")]
    difficulty: Difficulty,

    /// Sampled worlds per decision for the search difficulties.
    #[arg(long, value_name = "COUNT")]
    worlds: Option<usize>,

    /// Seed for dealing and computer decisions.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Your name at the table.
    #[arg(long, value_name = "NAME")]
    name: Option<String>,

    /// Resume a saved session instead of starting a new game.
    #[arg(long, value_name = "FILE")]
    resume: Option<PathBuf>,

    /// Default log filter when RUST_LOG is unset.
    #[arg(long, value_name = "FILTER", default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let mut runner = match &cli.resume {
        Some(path) => SessionSnapshot::load(path)
            .and_then(SessionSnapshot::restore)
            .with_context(|| format!("resuming session from {}", path.display()))?,
        None => {
            let seed = cli.seed.unwrap_or_else(rand::random);
            let names = cli.name.clone().map(|name| vec![name]);
            println!("Seed {seed}, {} opponents", cli.difficulty);
            GameRunner::new_game(
                cli.difficulty,
                cli.worlds,
                names,
                ChaCha8Rng::seed_from_u64(seed),
            )?
        }
    };

    let mut events = TerminalEvents {
        names: runner.seat_names().clone(),
    };
    render(&runner.view());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        let state = runner.state();
        if state.is_game_over() {
            announce_result(&runner.view(), runner.human_moon_shots());
            break;
        }
        if state.phase() == Phase::Playing && state.whose_turn() != HUMAN_SEAT {
            runner.advance(Some(&mut events))?;
            continue;
        }

        print!("> ");
        io::stdout().flush().context("flushing prompt")?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("reading input")?;

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => println!("{HELP}"),
            Command::Show => render(&runner.view()),
            Command::Save(path) => match runner.snapshot().save(&path) {
                Ok(()) => println!("Saved to {}", path.display()),
                Err(err) => eprintln!("{err}"),
            },
            Command::Cards(cards) => {
                let outcome = match (runner.state().phase(), cards.as_slice()) {
                    (Phase::Passing, _) => runner.submit_pass(&cards, Some(&mut events)),
                    (Phase::Playing, [card]) => runner.submit_play(*card, Some(&mut events)),
                    (Phase::Playing, _) => {
                        eprintln!("play exactly one card");
                        continue;
                    }
                };
                if let Err(err) = outcome {
                    eprintln!("{err}");
                }
            }
        }
    }

    Ok(())
}

fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // A subscriber may already be installed when embedded.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
