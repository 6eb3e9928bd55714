use crate::runner::GameRunner;
use hearts_bot::bot::UnseenTracker;
use hearts_bot::policy::Difficulty;
use hearts_core::game::state::GameState;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SESSION_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("reading or writing session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed session: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported session version {found} (expected {SESSION_VERSION})")]
    UnsupportedVersion { found: u32 },
}

/// Everything needed to resume a game exactly where it stopped, including
/// mid-trick and the generator that deals and drives the computer seats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: u32,
    pub state: GameState,
    pub seat_names: [String; 4],
    pub difficulty: Difficulty,
    pub worlds: Option<usize>,
    pub human_moon_shots: u32,
    pub rng: ChaCha8Rng,
    pub tracker: UnseenTracker,
}

impl SessionSnapshot {
    pub fn capture(runner: &GameRunner) -> Self {
        Self {
            version: SESSION_VERSION,
            state: runner.state.clone(),
            seat_names: runner.seat_names.clone(),
            difficulty: runner.difficulty,
            worlds: runner.worlds,
            human_moon_shots: runner.human_moon_shots,
            rng: runner.rng.clone(),
            tracker: runner.tracker.clone(),
        }
    }

    pub fn restore(self) -> Result<GameRunner, SessionError> {
        if self.version != SESSION_VERSION {
            return Err(SessionError::UnsupportedVersion {
                found: self.version,
            });
        }
        Ok(GameRunner::assemble(
            self.state,
            self.seat_names,
            self.difficulty,
            self.worlds,
            self.rng,
            self.tracker,
            self.human_moon_shots,
        ))
    }

    pub fn to_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let json = fs::read_to_string(path).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

impl GameRunner {
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(self)
    }

    pub fn resume(snapshot: SessionSnapshot) -> Result<GameRunner, SessionError> {
        snapshot.restore()
    }
}

#[cfg(test)]
mod tests {
    use super::{SESSION_VERSION, SessionError, SessionSnapshot};
    use crate::runner::GameRunner;
    use hearts_bot::policy::Difficulty;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn json_keeps_the_difficulty_label() {
        let runner = GameRunner::new_game(
            Difficulty::Harder,
            Some(8),
            None,
            ChaCha8Rng::seed_from_u64(5),
        )
        .unwrap();
        let json = runner.snapshot().to_json().unwrap();
        assert!(json.contains("\"difficulty\": \"harder\""));
        assert!(json.contains("\"worlds\": 8"));
        let back = SessionSnapshot::from_json(&json).unwrap();
        assert_eq!(back, runner.snapshot());
    }

    #[test]
    fn rejects_other_versions() {
        let runner =
            GameRunner::new_game(Difficulty::Easy, None, None, ChaCha8Rng::seed_from_u64(1))
                .unwrap();
        let mut snapshot = runner.snapshot();
        snapshot.version = SESSION_VERSION + 1;
        assert!(matches!(
            snapshot.restore(),
            Err(SessionError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn corrupt_state_fails_to_load() {
        let runner =
            GameRunner::new_game(Difficulty::Easy, None, None, ChaCha8Rng::seed_from_u64(2))
                .unwrap();
        let mut value: serde_json::Value =
            serde_json::from_str(&runner.snapshot().to_json().unwrap()).unwrap();
        value["state"]["round"] = serde_json::json!(0);
        let err = SessionSnapshot::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, SessionError::Json(_)));
    }
}
