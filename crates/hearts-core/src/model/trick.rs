use crate::model::card::Card;
use crate::model::player::PlayerPosition;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};

/// Cards played so far in the current trick, in play order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trick {
    plays: Vec<Play>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Play {
    pub seat: PlayerPosition,
    pub card: Card,
}

impl Play {
    pub const fn new(seat: PlayerPosition, card: Card) -> Self {
        Self { seat, card }
    }
}

impl Trick {
    pub fn new() -> Self {
        Self {
            plays: Vec::with_capacity(4),
        }
    }

    pub fn from_plays(plays: Vec<Play>) -> Self {
        Self { plays }
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn len(&self) -> usize {
        self.plays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == 4
    }

    pub fn leader(&self) -> Option<PlayerPosition> {
        self.plays.first().map(|play| play.seat)
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.plays.first().map(|play| play.card.suit)
    }

    pub fn contains(&self, card: Card) -> bool {
        self.plays.iter().any(|play| play.card == card)
    }

    pub fn has_played(&self, seat: PlayerPosition) -> bool {
        self.plays.iter().any(|play| play.seat == seat)
    }

    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.plays.iter().map(|play| play.card)
    }

    /// The play currently winning the trick, if any card has been led.
    pub fn current_winner(&self) -> Option<Play> {
        let lead = self.lead_suit()?;
        self.plays
            .iter()
            .copied()
            .filter(|play| play.card.suit == lead)
            .max_by_key(|play| play.card.rank)
    }

    /// A copy of this trick with one more play appended.
    pub fn with_play(&self, seat: PlayerPosition, card: Card) -> Trick {
        let mut plays = Vec::with_capacity(4);
        plays.extend_from_slice(&self.plays);
        plays.push(Play { seat, card });
        Trick { plays }
    }

    pub fn penalty_total(&self) -> u32 {
        self.plays
            .iter()
            .map(|play| play.card.penalty_value())
            .sum()
    }
}
