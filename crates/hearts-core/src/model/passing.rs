use crate::model::player::PlayerPosition;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassingDirection {
    Left,
    Right,
    Across,
    #[serde(rename = "none")]
    Hold,
}

impl PassingDirection {
    pub const CYCLE: [PassingDirection; 4] = [
        PassingDirection::Left,
        PassingDirection::Right,
        PassingDirection::Across,
        PassingDirection::Hold,
    ];

    /// Direction for a 1-based round number: left, right, across, hold, repeat.
    pub const fn for_round(round: u32) -> PassingDirection {
        Self::CYCLE[(round.saturating_sub(1) % 4) as usize]
    }

    pub const fn requires_selection(self) -> bool {
        !matches!(self, PassingDirection::Hold)
    }

    /// Seat that receives the cards passed by `seat`.
    pub const fn target(self, seat: PlayerPosition) -> PlayerPosition {
        match self {
            PassingDirection::Left => seat.next(),
            PassingDirection::Right => seat.previous(),
            PassingDirection::Across => seat.opposite(),
            PassingDirection::Hold => seat,
        }
    }

    /// Seat whose cards end up with `seat`.
    pub const fn source(self, seat: PlayerPosition) -> PlayerPosition {
        match self {
            PassingDirection::Left => seat.previous(),
            PassingDirection::Right => seat.next(),
            PassingDirection::Across => seat.opposite(),
            PassingDirection::Hold => seat,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PassingDirection::Left => "left",
            PassingDirection::Right => "right",
            PassingDirection::Across => "across",
            PassingDirection::Hold => "none",
        }
    }
}

impl FromStr for PassingDirection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(PassingDirection::Left),
            "right" => Ok(PassingDirection::Right),
            "across" => Ok(PassingDirection::Across),
            "none" | "hold" => Ok(PassingDirection::Hold),
            other => Err(format!("unknown passing direction {other:?}")),
        }
    }
}
