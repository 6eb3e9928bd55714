use crate::model::player::PlayerPosition;
use serde::{Deserialize, Serialize};

/// Total penalty points in one round: thirteen hearts plus the queen of spades.
pub const ROUND_PENALTY_TOTAL: u32 = 26;
/// A game ends once any cumulative total reaches this value.
pub const GAME_OVER_THRESHOLD: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Seat(PlayerPosition),
    /// No unique lowest total.
    Tie,
}

impl Winner {
    pub fn seat(self) -> Option<PlayerPosition> {
        match self {
            Winner::Seat(seat) => Some(seat),
            Winner::Tie => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreBoard {
    totals: [u32; 4],
}

impl ScoreBoard {
    pub const fn new() -> Self {
        Self { totals: [0; 4] }
    }

    pub const fn from_totals(totals: [u32; 4]) -> Self {
        Self { totals }
    }

    pub fn score(&self, seat: PlayerPosition) -> u32 {
        self.totals[seat.index()]
    }

    pub fn standings(&self) -> &[u32; 4] {
        &self.totals
    }

    /// Adds one round of penalties, applying shoot-the-moon when one seat
    /// took all 26 points.
    pub fn apply_round(&self, round_scores: [u32; 4]) -> ScoreBoard {
        let mut totals = self.totals;
        match moon_shooter(&round_scores) {
            Some(shooter) => {
                for seat in PlayerPosition::LOOP {
                    if seat != shooter {
                        totals[seat.index()] += ROUND_PENALTY_TOTAL;
                    }
                }
            }
            None => {
                for (total, points) in totals.iter_mut().zip(round_scores) {
                    *total += points;
                }
            }
        }
        ScoreBoard { totals }
    }

    pub fn is_game_over(&self) -> bool {
        self.totals.iter().any(|&total| total >= GAME_OVER_THRESHOLD)
    }

    /// Winner by lowest total, or `Tie` when the lowest total is shared.
    pub fn winner(&self) -> Winner {
        let lowest = self.totals.iter().copied().min().unwrap_or(0);
        let mut leaders = PlayerPosition::LOOP
            .iter()
            .copied()
            .filter(|seat| self.score(*seat) == lowest);
        match (leaders.next(), leaders.next()) {
            (Some(seat), None) => Winner::Seat(seat),
            _ => Winner::Tie,
        }
    }
}

pub fn moon_shooter(round_scores: &[u32; 4]) -> Option<PlayerPosition> {
    PlayerPosition::LOOP
        .iter()
        .copied()
        .find(|seat| round_scores[seat.index()] == ROUND_PENALTY_TOTAL)
}

/// Round cost for `seat` after the moon adjustment: zero for a shooter, 26 for
/// everyone else when someone shot, raw points otherwise.
pub fn moon_adjusted_cost(round_scores: &[u32; 4], seat: PlayerPosition) -> u32 {
    match moon_shooter(round_scores) {
        Some(shooter) if shooter == seat => 0,
        Some(_) => ROUND_PENALTY_TOTAL,
        None => round_scores[seat.index()],
    }
}
