use core::fmt;
use serde::{Deserialize, Serialize};

/// Seat at the table. Seat 0 is the human in the interactive runner; play
/// proceeds clockwise through increasing indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum PlayerPosition {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl PlayerPosition {
    pub const LOOP: [PlayerPosition; 4] = [
        PlayerPosition::North,
        PlayerPosition::East,
        PlayerPosition::South,
        PlayerPosition::West,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(PlayerPosition::North),
            1 => Some(PlayerPosition::East),
            2 => Some(PlayerPosition::South),
            3 => Some(PlayerPosition::West),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Seat `steps` places clockwise from this one.
    pub const fn offset(self, steps: usize) -> PlayerPosition {
        Self::LOOP[(self.index() + steps) % 4]
    }

    pub const fn next(self) -> PlayerPosition {
        self.offset(1)
    }

    pub const fn previous(self) -> PlayerPosition {
        self.offset(3)
    }

    pub const fn opposite(self) -> PlayerPosition {
        self.offset(2)
    }
}

impl From<PlayerPosition> for u8 {
    fn from(seat: PlayerPosition) -> u8 {
        seat as u8
    }
}

impl TryFrom<u8> for PlayerPosition {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        PlayerPosition::from_index(value as usize)
            .ok_or_else(|| format!("seat index {value} out of range 0..4"))
    }
}

impl fmt::Display for PlayerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seat {}", self.index())
    }
}
