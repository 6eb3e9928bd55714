use std::collections::HashMap;
use std::fs;
use std::path::Path;

use hearts_bot::policy::Difficulty;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

use crate::config::BenchmarkConfig;
use crate::tournament::{DecisionSummary, GameOutcome};

const CONFIDENCE_Z: f64 = 1.96; // 95% CI

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("agent '{0}' defined in results but missing from configuration")]
    UnknownAgent(String),
    #[error("baseline '{0}' missing for game {1}")]
    MissingBaselineGame(String, String),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Accumulates per-agent results across every game of a run.
pub struct AnalyticsCollector {
    baseline: Option<String>,
    agents: HashMap<String, AgentAccumulator>,
    comparisons: HashMap<String, ComparisonAccumulator>,
    agent_order: Vec<String>,
    latency_budget_ms: u64,
}

impl AnalyticsCollector {
    pub fn new(config: &BenchmarkConfig) -> Self {
        let mut agents = HashMap::new();
        let mut order = Vec::new();
        for agent in &config.agents {
            agents.insert(
                agent.name.clone(),
                AgentAccumulator::new(agent.name.clone(), agent.difficulty, agent.worlds),
            );
            order.push(agent.name.clone());
        }

        Self {
            baseline: config.metrics.baseline.clone(),
            agents,
            comparisons: HashMap::new(),
            agent_order: order,
            latency_budget_ms: config.metrics.latency_budget_ms,
        }
    }

    pub fn record_game(&mut self, game_id: &str, outcome: &GameOutcome) -> Result<(), AnalyticsError> {
        for seat in &outcome.seat_results {
            let acc = self
                .agents
                .get_mut(&seat.agent_name)
                .ok_or_else(|| AnalyticsError::UnknownAgent(seat.agent_name.clone()))?;
            acc.record_game(
                f64::from(seat.points),
                outcome.winner.seat() == Some(seat.seat),
                seat.moon_shots,
                &seat.metrics,
            );
        }

        let Some(baseline) = self.baseline.as_ref() else {
            return Ok(());
        };
        let baseline_points = outcome
            .seat_results
            .iter()
            .find(|seat| &seat.agent_name == baseline)
            .map(|seat| f64::from(seat.points))
            .ok_or_else(|| {
                AnalyticsError::MissingBaselineGame(baseline.clone(), game_id.to_string())
            })?;

        for seat in &outcome.seat_results {
            if &seat.agent_name == baseline {
                continue;
            }
            self.comparisons
                .entry(seat.agent_name.clone())
                .or_default()
                .record(f64::from(seat.points) - baseline_points);
        }

        Ok(())
    }

    pub fn finalize(mut self) -> AnalyticsSummary {
        let mut reports = Vec::new();
        for name in &self.agent_order {
            if let Some(acc) = self.agents.remove(name) {
                reports.push(acc.into_report(self.latency_budget_ms));
            }
        }

        let baseline_avg = self.baseline.as_ref().and_then(|baseline| {
            reports
                .iter()
                .find(|report| &report.name == baseline)
                .map(|report| report.avg_points)
        });
        for report in &mut reports {
            report.delta_vs_baseline = baseline_avg.map(|avg| report.avg_points - avg);
            if self.baseline.as_ref() == Some(&report.name) {
                continue;
            }
            if let Some(comparison) = self.comparisons.remove(&report.name) {
                report.p_value = Some(comparison.wilcoxon_signed_rank().0);
            }
        }

        AnalyticsSummary {
            baseline: self.baseline,
            agents: reports,
            latency_budget_ms: self.latency_budget_ms,
        }
    }
}

struct AgentAccumulator {
    name: String,
    difficulty: Difficulty,
    worlds: Option<usize>,
    per_game_points: Vec<f64>,
    wins: u32,
    moon_shots: u32,
    total_latency_ms: f64,
    total_decisions: u64,
}

impl AgentAccumulator {
    fn new(name: String, difficulty: Difficulty, worlds: Option<usize>) -> Self {
        Self {
            name,
            difficulty,
            worlds,
            per_game_points: Vec::new(),
            wins: 0,
            moon_shots: 0,
            total_latency_ms: 0.0,
            total_decisions: 0,
        }
    }

    fn record_game(
        &mut self,
        points: f64,
        is_winner: bool,
        moon_shots: u32,
        metrics: &DecisionSummary,
    ) {
        self.per_game_points.push(points);
        if is_winner {
            self.wins += 1;
        }
        self.moon_shots += moon_shots;
        self.total_latency_ms += metrics.total_ms;
        self.total_decisions += u64::from(metrics.decisions);
    }

    fn into_report(self, latency_budget_ms: u64) -> AgentReport {
        let games = self.per_game_points.len();
        let avg_points = if games == 0 {
            0.0
        } else {
            self.per_game_points.iter().sum::<f64>() / games as f64
        };
        let avg_latency = if self.total_decisions == 0 {
            0.0
        } else {
            self.total_latency_ms / self.total_decisions as f64
        };

        AgentReport {
            ci95: confidence_interval(&self.per_game_points),
            name: self.name,
            difficulty: self.difficulty,
            worlds: self.worlds.or(self.difficulty.default_worlds()),
            games,
            avg_points,
            wins: self.wins as usize,
            moon_shots: self.moon_shots as usize,
            average_ms_per_decision: avg_latency,
            over_budget: avg_latency > latency_budget_ms as f64,
            delta_vs_baseline: None,
            p_value: None,
        }
    }
}

#[derive(Clone, Default)]
struct ComparisonAccumulator {
    diffs: Vec<f64>,
}

impl ComparisonAccumulator {
    fn record(&mut self, diff: f64) {
        self.diffs.push(diff);
    }

    /// Two-sided Wilcoxon signed-rank test on the paired differences,
    /// normal approximation with tie correction.
    fn wilcoxon_signed_rank(self) -> (f64, usize) {
        let diffs: Vec<f64> = self
            .diffs
            .into_iter()
            .filter(|d| d.abs() > f64::EPSILON)
            .collect();
        let n = diffs.len();
        if n == 0 {
            return (1.0, 0);
        }

        let mut paired: Vec<(f64, f64)> =
            diffs.into_iter().map(|d| (d.abs(), d.signum())).collect();
        paired.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut ranks = Vec::with_capacity(n);
        let mut tie_sizes = Vec::new();
        let mut i = 0;
        while i < paired.len() {
            let mut j = i;
            while j + 1 < paired.len() && (paired[j + 1].0 - paired[i].0).abs() < 1e-12 {
                j += 1;
            }
            let rank = (i + j + 2) as f64 / 2.0;
            ranks.extend(paired[i..=j].iter().map(|(_, sign)| (rank, *sign)));
            if j > i {
                tie_sizes.push(j - i + 1);
            }
            i = j + 1;
        }

        let rank_sum = |positive: bool| -> f64 {
            ranks
                .iter()
                .filter(|(_, sign)| (*sign > 0.0) == positive)
                .map(|(rank, _)| *rank)
                .sum()
        };
        let w = rank_sum(true).min(rank_sum(false));
        let n_f = n as f64;
        let mean_w = n_f * (n_f + 1.0) / 4.0;

        let tie_adjustment: f64 = tie_sizes
            .into_iter()
            .map(|count| {
                let c = count as f64;
                (c.powi(3) - c) / 48.0
            })
            .sum();
        let variance_w = n_f * (n_f + 1.0) * (2.0 * n_f + 1.0) / 24.0 - tie_adjustment;
        if variance_w <= 0.0 {
            return (1.0, n);
        }

        let Ok(normal) = Normal::new(0.0, 1.0) else {
            return (1.0, n);
        };
        let z = ((w - mean_w).abs() - 0.5) / variance_w.sqrt();
        let p = 2.0 * (1.0 - normal.cdf(z));
        (p.clamp(0.0, 1.0), n)
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    pub baseline: Option<String>,
    pub agents: Vec<AgentReport>,
    pub latency_budget_ms: u64,
}

impl AnalyticsSummary {
    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        let mut rows = String::new();
        rows.push_str("# Tournament Summary\n\n");
        if let Some(baseline) = &self.baseline {
            rows.push_str(&format!("Baseline: {baseline}\n\n"));
        }
        rows.push_str(&format!(
            "Latency budget: {} ms average per decision\n\n",
            self.latency_budget_ms
        ));
        rows.push_str("| Agent | Difficulty | Worlds | Games | Avg points | Δ vs baseline | 95% CI | Wins | Win % | Moons | Avg ms/decision | Over Budget | p-value |\n");
        rows.push_str("|-------|------------|--------|-------|------------|----------------|--------|------|-------|-------|------------------|-------------|---------|\n");

        for agent in &self.agents {
            let win_rate = if agent.games == 0 {
                0.0
            } else {
                agent.wins as f64 / agent.games as f64
            };
            let worlds = agent
                .worlds
                .map(|w| w.to_string())
                .unwrap_or_else(|| "-".to_string());
            let delta = agent
                .delta_vs_baseline
                .map(|d| format!("{d:+.3}"))
                .unwrap_or_else(|| "-".to_string());
            let p_value = agent
                .p_value
                .map(|p| format!("{p:.3}"))
                .unwrap_or_else(|| "-".to_string());

            rows.push_str(&format!(
                "| {name} | {difficulty} | {worlds} | {games} | {avg:.3} | {delta} | [{ci_low:.3}, {ci_high:.3}] | {wins} | {win:.1}% | {moons} | {latency:.2} | {over_budget} | {p_value} |\n",
                name = agent.name,
                difficulty = agent.difficulty,
                games = agent.games,
                avg = agent.avg_points,
                ci_low = agent.ci95.0,
                ci_high = agent.ci95.1,
                wins = agent.wins,
                win = win_rate * 100.0,
                moons = agent.moon_shots,
                latency = agent.average_ms_per_decision,
                over_budget = if agent.over_budget { "Yes" } else { "No" },
            ));
        }

        fs::write(path.as_ref(), rows).map_err(|e| AnalyticsError::Io {
            context: "writing summary markdown",
            source: e,
        })?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    pub name: String,
    pub difficulty: Difficulty,
    pub worlds: Option<usize>,
    pub games: usize,
    pub avg_points: f64,
    pub ci95: (f64, f64),
    pub wins: usize,
    pub moon_shots: usize,
    pub average_ms_per_decision: f64,
    pub over_budget: bool,
    pub delta_vs_baseline: Option<f64>,
    pub p_value: Option<f64>,
}

fn confidence_interval(points: &[f64]) -> (f64, f64) {
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let mean = points.iter().sum::<f64>() / points.len() as f64;
    if points.len() == 1 {
        return (mean, mean);
    }
    let variance = points
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (points.len() as f64 - 1.0);
    let std_error = (variance / points.len() as f64).sqrt();
    let margin = CONFIDENCE_Z * std_error;
    (mean - margin, mean + margin)
}

#[cfg(test)]
mod tests {
    use super::{ComparisonAccumulator, confidence_interval};

    #[test]
    fn interval_collapses_for_one_game() {
        assert_eq!(confidence_interval(&[42.0]), (42.0, 42.0));
        let (low, high) = confidence_interval(&[10.0, 20.0, 30.0]);
        assert!(low < 20.0 && high > 20.0);
        assert!((low + high - 40.0).abs() < 1e-9);
    }

    #[test]
    fn identical_results_are_not_significant() {
        let mut same = ComparisonAccumulator::default();
        for _ in 0..10 {
            same.record(0.0);
        }
        assert_eq!(same.wilcoxon_signed_rank(), (1.0, 0));
    }

    #[test]
    fn consistent_gap_is_significant() {
        let mut gap = ComparisonAccumulator::default();
        for i in 0..30 {
            gap.record(-10.0 - f64::from(i));
        }
        let (p, n) = gap.wilcoxon_signed_rank();
        assert_eq!(n, 30);
        assert!(p < 0.01, "p = {p}");
    }
}
