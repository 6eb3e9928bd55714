mod hard;
mod heuristic;
mod random;

pub use hard::{HardPass, HardPlay};
pub use heuristic::{HeuristicPass, HeuristicPlay};
pub use random::{RandomPass, RandomPlay};

use crate::bot::{SearchConfig, UnseenTracker};
use hearts_core::game::state::GameState;
use hearts_core::model::card::Card;
use hearts_core::model::hand::Hand;
use hearts_core::model::passing::PassingDirection;
use hearts_core::model::player::PlayerPosition;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// What a play strategy may look at: the table, its own seat and legal
/// cards, and the public knowledge gathered this round.
pub struct PlayContext<'a> {
    pub state: &'a GameState,
    pub seat: PlayerPosition,
    pub legal: &'a [Card],
    pub tracker: &'a UnseenTracker,
}

/// Chooses the three cards a seat passes.
pub trait PassStrategy: Send {
    /// `hand` holds thirteen cards; the result must be three distinct cards from it.
    fn choose_pass(
        &mut self,
        seat: PlayerPosition,
        hand: &Hand,
        direction: PassingDirection,
        rng: &mut dyn RngCore,
    ) -> [Card; 3];
}

/// Chooses one card from `ctx.legal`.
///
/// # Panics
///
/// Implementations panic when `ctx.legal` is empty; callers only ask for a
/// play when the seat is on turn with cards in hand.
pub trait PlayStrategy: Send {
    fn choose_play(&mut self, ctx: &PlayContext<'_>, rng: &mut dyn RngCore) -> Card;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
    Harder,
    Hardest,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Harder,
        Difficulty::Hardest,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Harder => "harder",
            Difficulty::Hardest => "hardest",
        }
    }

    /// Sampled worlds per decision for the search tiers.
    pub const fn default_worlds(self) -> Option<usize> {
        match self {
            Difficulty::Easy | Difficulty::Medium => None,
            Difficulty::Hard => Some(50),
            Difficulty::Harder => Some(100),
            Difficulty::Hardest => Some(150),
        }
    }

    pub const fn uses_search(self) -> bool {
        self.default_worlds().is_some()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty {0:?}; use easy, medium, hard, harder or hardest")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_ascii_lowercase();
        Difficulty::ALL
            .into_iter()
            .find(|difficulty| difficulty.label() == wanted)
            .ok_or_else(|| UnknownDifficulty(raw.to_string()))
    }
}

/// A pass strategy and a play strategy for one difficulty.
pub struct Strategies {
    pub difficulty: Difficulty,
    pub pass: Box<dyn PassStrategy>,
    pub play: Box<dyn PlayStrategy>,
}

/// Builds the strategy pair for `difficulty`. `worlds` overrides the sample
/// count of the search tiers and is ignored by the others.
pub fn create_strategies(difficulty: Difficulty, worlds: Option<usize>) -> Strategies {
    let (pass, play): (Box<dyn PassStrategy>, Box<dyn PlayStrategy>) = match difficulty {
        Difficulty::Easy => (Box::new(RandomPass), Box::new(RandomPlay)),
        Difficulty::Medium => (Box::new(HeuristicPass), Box::new(HeuristicPlay)),
        Difficulty::Hard | Difficulty::Harder | Difficulty::Hardest => {
            let base = worlds.or(difficulty.default_worlds()).unwrap_or_default();
            let config = SearchConfig::with_worlds(base).with_env_overrides();
            (Box::new(HardPass), Box::new(HardPlay::new(difficulty, config)))
        }
    };
    Strategies {
        difficulty,
        pass,
        play,
    }
}

pub(crate) fn format_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(Card::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
