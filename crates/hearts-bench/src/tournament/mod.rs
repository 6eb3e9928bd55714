mod permutations;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use hearts_bot::bot::UnseenTracker;
use hearts_bot::policy::{PlayContext, Strategies, create_strategies};
use hearts_core::error::GameError;
use hearts_core::game::state::{GameState, Phase};
use hearts_core::game::transitions::{
    apply_passes, apply_play, apply_round_scoring, deal_shuffled_round, new_game,
};
use hearts_core::model::card::Card;
use hearts_core::model::player::PlayerPosition;
use hearts_core::model::score::{ScoreBoard, Winner, moon_shooter};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::analytics::{AnalyticsCollector, AnalyticsError};
use crate::config::{AgentConfig, BenchmarkConfig, ResolvedOutputs, SEATS};

pub use permutations::SeatPermutations;

/// Plays every configured game under every requested seating.
pub struct TournamentRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    seat_permutations: SeatPermutations,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub games_played: usize,
    pub permutations: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
}

impl TournamentRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        if config.agents.len() != SEATS {
            return Err(RunnerError::SeatCount {
                found: config.agents.len(),
            });
        }
        let seat_permutations = SeatPermutations::new(config.games.permutations);
        Ok(Self {
            config,
            outputs,
            seat_permutations,
        })
    }

    /// Execute the tournament, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let permutations = self.seat_permutations.as_slice();
        let mut seeder = ChaCha8Rng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let mut rows_written = 0usize;
        let mut analytics = AnalyticsCollector::new(&self.config);

        for game_index in 0..self.config.games.count {
            let game_seed = seeder.next_u64();

            for (perm_index, perm) in permutations.iter().enumerate() {
                let game_id = format!("G{game_index:05}_P{perm_index:02}");
                let outcome = self.play_game(game_seed, perm)?;
                log_outcome(&self.config.run_id, &game_id, &outcome);
                analytics.record_game(&game_id, &outcome)?;
                rows_written += write_game_rows(
                    &mut writer,
                    &self.config.run_id,
                    &game_id,
                    game_index,
                    perm_index,
                    game_seed,
                    &outcome,
                )?;
            }
        }

        writer.flush()?;

        let summary = analytics.finalize();
        summary.write_markdown(&self.outputs.summary_md)?;

        Ok(RunSummary {
            games_played: self.config.games.count,
            permutations: permutations.len(),
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
        })
    }

    /// One full game with agent `permutation[i]` in seat `i`.
    ///
    /// Deals come from stream 0 of a generator seeded with `game_seed` and
    /// every decision draws from stream 1, so all seatings of one game see
    /// the same cards.
    pub fn play_game(
        &self,
        game_seed: u64,
        permutation: &[usize; 4],
    ) -> Result<GameOutcome, RunnerError> {
        let mut seats = build_seat_states(permutation, &self.config.agents)?;
        let mut deal_rng = ChaCha8Rng::seed_from_u64(game_seed);
        let mut decide_rng = deal_rng.clone();
        decide_rng.set_stream(1);

        let mut state = new_game(&mut deal_rng)?;
        let mut tracker = UnseenTracker::new();
        tracker.reset_for_round(state.round());
        let mut rounds = 0u32;
        let max_rounds = self.config.games.max_rounds;

        loop {
            match state.phase() {
                Phase::Passing => {
                    let passes = choose_passes(&mut seats, &state, &mut decide_rng);
                    state = apply_passes(&state, &passes)?;
                }
                Phase::Playing => {
                    let seat = state.whose_turn();
                    let legal = state.legal_plays_for(seat);
                    let ctx = PlayContext {
                        state: &state,
                        seat,
                        legal: &legal,
                        tracker: &tracker,
                    };
                    let seat_state = &mut seats[seat.index()];
                    let start = Instant::now();
                    let card = seat_state.strategies.play.choose_play(&ctx, &mut decide_rng);
                    seat_state.metrics.record(start.elapsed());

                    tracker.observe_play(&state, seat, card);
                    state = apply_play(&state, seat, card)?;
                }
            }

            if !state.is_round_complete() {
                continue;
            }

            if let Some(shooter) = moon_shooter(state.round_scores()) {
                seats[shooter.index()].moon_shots += 1;
            }
            state = apply_round_scoring(&state);
            rounds += 1;
            if state.is_game_over() || rounds >= max_rounds {
                break;
            }
            state = deal_shuffled_round(*state.scores(), state.round() + 1, &mut deal_rng)?;
            tracker.reset_for_round(state.round());
        }

        Ok(finish_game(&state, seats, rounds))
    }
}

fn choose_passes(
    seats: &mut [SeatState],
    state: &GameState,
    rng: &mut ChaCha8Rng,
) -> [[Card; 3]; 4] {
    let mut passes = [[Card::TWO_OF_CLUBS; 3]; 4];
    for (slot, seat_state) in passes.iter_mut().zip(seats.iter_mut()) {
        let seat = seat_state.seat;
        let start = Instant::now();
        *slot = seat_state.strategies.pass.choose_pass(
            seat,
            state.hand(seat),
            state.pass_direction(),
            rng,
        );
        seat_state.metrics.record(start.elapsed());
    }
    passes
}

fn finish_game(state: &GameState, seats: Vec<SeatState>, rounds: u32) -> GameOutcome {
    let completed = state.is_game_over();
    let scores = *state.scores();
    let winner = state
        .winner()
        .unwrap_or_else(|| ScoreBoard::from_totals(scores).winner());

    let seating = seats
        .iter()
        .map(|seat| SeatSnapshot {
            seat: seat_label(seat.seat).to_string(),
            agent: seat.agent_name.clone(),
        })
        .collect();

    let seat_results = seats
        .into_iter()
        .map(|seat| SeatResult {
            points: scores[seat.seat.index()],
            agent_name: seat.agent_name,
            difficulty: seat.strategies.difficulty.label(),
            seat: seat.seat,
            moon_shots: seat.moon_shots,
            metrics: seat.metrics.finalize(),
        })
        .collect();

    GameOutcome {
        seating,
        seat_results,
        scores,
        winner,
        rounds,
        completed,
    }
}

fn log_outcome(run_id: &str, game_id: &str, outcome: &GameOutcome) {
    if !tracing::enabled!(target: "hearts_bench::game", Level::INFO) {
        return;
    }
    let winner = match outcome.winner {
        Winner::Seat(seat) => seat_label(seat),
        Winner::Tie => "tie",
    };
    event!(
        target: "hearts_bench::game",
        Level::INFO,
        run_id = %run_id,
        game_id = %game_id,
        scores = ?outcome.scores,
        rounds = outcome.rounds,
        completed = outcome.completed,
        winner,
    );
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_game_rows(
    writer: &mut BufWriter<File>,
    run_id: &str,
    game_id: &str,
    game_index: usize,
    permutation_index: usize,
    game_seed: u64,
    outcome: &GameOutcome,
) -> Result<usize, RunnerError> {
    let mut rows_written = 0usize;
    for seat_result in &outcome.seat_results {
        let row = GameLogRow {
            run_id,
            game_id,
            game_index,
            permutation_index,
            game_seed,
            seat: seat_label(seat_result.seat),
            agent: &seat_result.agent_name,
            difficulty: seat_result.difficulty,
            seating: &outcome.seating,
            points: seat_result.points,
            rounds: outcome.rounds,
            moon_shots: seat_result.moon_shots,
            won: outcome.winner.seat() == Some(seat_result.seat),
            completed: outcome.completed,
            decisions: seat_result.metrics.decisions,
            speed_ms_turn: seat_result.metrics.avg_ms_per_decision,
        };

        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        rows_written += 1;
    }

    Ok(rows_written)
}

fn build_seat_states(
    permutation: &[usize; 4],
    agents: &[AgentConfig],
) -> Result<Vec<SeatState>, RunnerError> {
    let mut seats = Vec::with_capacity(SEATS);
    for (seat_idx, agent_idx) in permutation.iter().enumerate() {
        let seat = PlayerPosition::from_index(seat_idx).ok_or(RunnerError::InvalidPermutation {
            index: seat_idx,
            agent_index: *agent_idx,
        })?;
        let agent = agents
            .get(*agent_idx)
            .ok_or(RunnerError::InvalidPermutation {
                index: seat_idx,
                agent_index: *agent_idx,
            })?;
        seats.push(SeatState {
            seat,
            agent_name: agent.name.clone(),
            strategies: create_strategies(agent.difficulty, agent.worlds),
            metrics: DecisionMetrics::default(),
            moon_shots: 0,
        });
    }
    Ok(seats)
}

fn seat_label(position: PlayerPosition) -> &'static str {
    match position {
        PlayerPosition::North => "north",
        PlayerPosition::East => "east",
        PlayerPosition::South => "south",
        PlayerPosition::West => "west",
    }
}

struct SeatState {
    seat: PlayerPosition,
    agent_name: String,
    strategies: Strategies,
    metrics: DecisionMetrics,
    moon_shots: u32,
}

/// Result of one game under one seating.
pub struct GameOutcome {
    pub seating: Vec<SeatSnapshot>,
    pub seat_results: Vec<SeatResult>,
    pub scores: [u32; 4],
    pub winner: Winner,
    pub rounds: u32,
    /// False when the game hit `max_rounds` before anyone reached 100.
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatSnapshot {
    pub seat: String,
    pub agent: String,
}

pub struct SeatResult {
    pub agent_name: String,
    pub difficulty: &'static str,
    pub seat: PlayerPosition,
    pub points: u32,
    pub moon_shots: u32,
    pub metrics: DecisionSummary,
}

#[derive(Default)]
struct DecisionMetrics {
    total: Duration,
    decisions: u32,
}

impl DecisionMetrics {
    fn record(&mut self, duration: Duration) {
        self.total += duration;
        self.decisions += 1;
    }

    fn finalize(self) -> DecisionSummary {
        let total_ms = self.total.as_secs_f64() * 1000.0;
        let avg_ms = if self.decisions == 0 {
            0.0
        } else {
            total_ms / f64::from(self.decisions)
        };

        DecisionSummary {
            decisions: self.decisions,
            avg_ms_per_decision: avg_ms,
            total_ms,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DecisionSummary {
    pub decisions: u32,
    pub avg_ms_per_decision: f64,
    pub total_ms: f64,
}

#[derive(Serialize)]
struct GameLogRow<'a> {
    run_id: &'a str,
    game_id: &'a str,
    game_index: usize,
    permutation_index: usize,
    game_seed: u64,
    seat: &'static str,
    agent: &'a str,
    difficulty: &'static str,
    seating: &'a [SeatSnapshot],
    points: u32,
    rounds: u32,
    moon_shots: u32,
    won: bool,
    completed: bool,
    decisions: u32,
    speed_ms_turn: f64,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("game execution failed: {0}")]
    Game(#[from] GameError),
    #[error("configuration requires exactly 4 agents but found {found}")]
    SeatCount { found: usize },
    #[error("permutation index {index} references invalid agent index {agent_index}")]
    InvalidPermutation { index: usize, agent_index: usize },
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}
