use hearts_bot::policy::Difficulty;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_SEAT_PERMUTATIONS: usize = 4;
const DEFAULT_MAX_ROUNDS: u32 = 50;
const DEFAULT_LATENCY_BUDGET_MS: u64 = 1_200;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";
pub const SEATS: usize = 4;
pub const MAX_SEAT_PERMUTATIONS: usize = 24;

/// Root benchmark configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchmarkConfig {
    pub run_id: String,
    pub games: GamesConfig,
    pub agents: Vec<AgentConfig>,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BenchmarkConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let cfg: BenchmarkConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.games.validate()?;
        validate_agents(&self.agents)?;
        self.outputs.validate(&self.run_id)?;
        self.metrics.validate(&self.agents)?;
        Ok(())
    }

    /// Resolve output templates (e.g., `{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
        }
    }
}

/// How many games to play and how to seat the agents.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GamesConfig {
    pub seed: Option<u64>,
    pub count: usize,
    #[serde(default = "default_permutations")]
    pub permutations: usize,
    /// Games still running after this many rounds are cut off and scored as they stand.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
}

impl GamesConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.count == 0 {
            return Err(invalid("games.count", "number of games must be greater than zero"));
        }

        if self.permutations == 0 {
            return Err(invalid("games.permutations", "permutations must be at least 1"));
        }

        if self.permutations > MAX_SEAT_PERMUTATIONS {
            return Err(invalid(
                "games.permutations",
                format!("at most {MAX_SEAT_PERMUTATIONS} seatings exist for four agents"),
            ));
        }

        if self.max_rounds == 0 {
            return Err(invalid("games.max_rounds", "max_rounds must be at least 1"));
        }

        Ok(())
    }
}

fn default_permutations() -> usize {
    DEFAULT_SEAT_PERMUTATIONS
}

fn default_max_rounds() -> u32 {
    DEFAULT_MAX_ROUNDS
}

/// Definition of a tournament participant.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AgentConfig {
    pub name: String,
    pub difficulty: Difficulty,
    /// Sampled worlds per decision; only meaningful for the search difficulties.
    #[serde(default)]
    pub worlds: Option<usize>,
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(label, "path must not be empty"));
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(invalid(label, "resolved path is invalid"));
            }
        }

        if resolve_template(run_id, &self.jsonl) == resolve_template(run_id, &self.summary_md) {
            return Err(invalid(
                "outputs.summary_md",
                "summary must not overwrite the JSONL output",
            ));
        }
        Ok(())
    }
}

/// Metrics configuration block.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MetricsConfig {
    /// Agent the others are compared against, game by game.
    #[serde(default)]
    pub baseline: Option<String>,
    #[serde(default = "default_latency_budget_ms")]
    pub latency_budget_ms: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            baseline: None,
            latency_budget_ms: DEFAULT_LATENCY_BUDGET_MS,
        }
    }
}

impl MetricsConfig {
    fn validate(&self, agents: &[AgentConfig]) -> Result<(), ValidationError> {
        if let Some(baseline) = self.baseline.as_ref()
            && !agents.iter().any(|a| &a.name == baseline)
        {
            return Err(invalid(
                "metrics.baseline",
                format!("baseline agent '{baseline}' is not defined in agents list"),
            ));
        }

        if self.latency_budget_ms == 0 {
            return Err(invalid(
                "metrics.latency_budget_ms",
                "latency budget must be greater than zero",
            ));
        }

        Ok(())
    }
}

fn default_latency_budget_ms() -> u64 {
    DEFAULT_LATENCY_BUDGET_MS
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(invalid("run_id", "run_id must not be empty"));
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(invalid(
            "run_id",
            "run_id may only contain alphanumeric characters, '.', '_' or '-'",
        ));
    }

    Ok(())
}

fn validate_agents(agents: &[AgentConfig]) -> Result<(), ValidationError> {
    if agents.len() != SEATS {
        return Err(invalid(
            "agents",
            format!("exactly {SEATS} agents are required, found {}", agents.len()),
        ));
    }

    let mut seen = HashSet::new();
    for (index, agent) in agents.iter().enumerate() {
        if agent.name.trim().is_empty() {
            return Err(invalid(
                format!("agents[{index}].name"),
                "agent name must not be empty",
            ));
        }

        if !agent.name.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
            return Err(invalid(
                format!("agents[{index}].name"),
                "agent name contains invalid characters",
            ));
        }

        if !seen.insert(agent.name.as_str()) {
            return Err(invalid(
                "agents",
                format!("agent name '{}' defined more than once", agent.name),
            ));
        }

        match agent.worlds {
            Some(0) => {
                return Err(invalid(
                    format!("agents[{index}].worlds"),
                    "worlds must be greater than zero",
                ));
            }
            Some(_) if !agent.difficulty.uses_search() => {
                return Err(invalid(
                    format!("agents[{index}].worlds"),
                    format!("{} does not sample worlds", agent.difficulty),
                ));
            }
            _ => {}
        }
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidField {
        field: field.into(),
        message: message.into(),
    }
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_YAML: &str = r#"
run_id: "stage0_smoke"
games:
  seed: 123
  count: 16
agents:
  - name: "random"
    difficulty: "easy"
  - name: "medium"
    difficulty: "medium"
  - name: "hard"
    difficulty: "hard"
    worlds: 20
  - name: "hardest"
    difficulty: "hardest"
outputs:
  jsonl: "bench/out/{run_id}/games.jsonl"
  summary_md: "bench/out/{run_id}/summary.md"
metrics:
  baseline: "medium"
logging:
  enable_structured: true
  tracing_level: "debug"
"#;

    fn parse(yaml: &str) -> BenchmarkConfig {
        serde_yaml::from_str(yaml).expect("parse yaml")
    }

    fn field_of(err: ValidationError) -> String {
        let ValidationError::InvalidField { field, .. } = err;
        field
    }

    #[test]
    fn loads_and_validates_basic_config() {
        let cfg = parse(BASIC_YAML);
        cfg.validate().expect("validate");

        assert_eq!(cfg.games.permutations, DEFAULT_SEAT_PERMUTATIONS);
        assert_eq!(cfg.games.max_rounds, DEFAULT_MAX_ROUNDS);
        assert_eq!(cfg.metrics.latency_budget_ms, DEFAULT_LATENCY_BUDGET_MS);
        assert_eq!(cfg.agents[2].worlds, Some(20));
        assert_eq!(cfg.agents[3].difficulty, Difficulty::Hardest);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));

        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.jsonl,
            PathBuf::from("bench/out/stage0_smoke/games.jsonl")
        );
    }

    #[test]
    fn blank_or_unknown_level_leaves_the_default_to_logging() {
        let cfg = parse(&BASIC_YAML.replace("tracing_level: \"debug\"", "tracing_level: \"\""));
        cfg.validate().expect("blank level is accepted");
        assert_eq!(cfg.logging.level(), None);

        let cfg = parse(&BASIC_YAML.replace("tracing_level: \"debug\"", "tracing_level: \"Warning\""));
        assert_eq!(cfg.logging.level(), Some(Level::WARN));
    }

    #[test]
    fn baseline_is_optional_but_must_exist() {
        let cfg = parse(&BASIC_YAML.replace("  baseline: \"medium\"\n", ""));
        cfg.validate().expect("no baseline is fine");
        assert_eq!(cfg.metrics.baseline, None);

        let cfg = parse(&BASIC_YAML.replace("baseline: \"medium\"", "baseline: \"nobody\""));
        assert_eq!(field_of(cfg.validate().unwrap_err()), "metrics.baseline");
    }

    #[test]
    fn requires_four_distinct_agents() {
        let three = BASIC_YAML.replace("  - name: \"hardest\"\n    difficulty: \"hardest\"\n", "");
        assert_eq!(field_of(parse(&three).validate().unwrap_err()), "agents");

        let duplicate = BASIC_YAML.replace("name: \"hardest\"", "name: \"hard\"");
        assert_eq!(field_of(parse(&duplicate).validate().unwrap_err()), "agents");
    }

    #[test]
    fn worlds_only_for_search_agents() {
        let yaml = BASIC_YAML.replace(
            "difficulty: \"medium\"\n",
            "difficulty: \"medium\"\n    worlds: 10\n",
        );
        assert_eq!(
            field_of(parse(&yaml).validate().unwrap_err()),
            "agents[1].worlds"
        );

        let zero = BASIC_YAML.replace("worlds: 20", "worlds: 0");
        assert_eq!(
            field_of(parse(&zero).validate().unwrap_err()),
            "agents[2].worlds"
        );
    }

    #[test]
    fn unknown_difficulty_fails_to_parse() {
        let yaml = BASIC_YAML.replace("difficulty: \"easy\"", "difficulty: \"expert\"");
        assert!(serde_yaml::from_str::<BenchmarkConfig>(&yaml).is_err());
    }

    #[test]
    fn rejects_invalid_run_id_and_counts() {
        let cfg = parse(&BASIC_YAML.replace("stage0_smoke", "stage 0 smoke"));
        assert_eq!(field_of(cfg.validate().unwrap_err()), "run_id");

        let cfg = parse(&BASIC_YAML.replace("count: 16", "count: 0"));
        assert_eq!(field_of(cfg.validate().unwrap_err()), "games.count");

        let cfg = parse(&BASIC_YAML.replace("count: 16", "count: 16\n  permutations: 25"));
        assert_eq!(field_of(cfg.validate().unwrap_err()), "games.permutations");
    }

    #[test]
    fn outputs_resolve_template_multiple_occurrences() {
        let yaml = BASIC_YAML.replace(
            "bench/out/{run_id}/summary.md",
            "bench/out/{run_id}/{run_id}/summary.md",
        );
        let cfg = parse(&yaml);
        cfg.validate().expect("valid");
        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.summary_md,
            PathBuf::from("bench/out/stage0_smoke/stage0_smoke/summary.md")
        );
    }
}
