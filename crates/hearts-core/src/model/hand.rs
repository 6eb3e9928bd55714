use crate::model::card::Card;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};

/// Cards held by one seat, in the order they were received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn count_suit(&self, suit: Suit) -> usize {
        self.cards.iter().filter(|card| card.suit == suit).count()
    }

    pub fn has_suit(&self, suit: Suit) -> bool {
        self.cards.iter().any(|card| card.suit == suit)
    }

    /// A copy of this hand with `card` removed, keeping the order of the rest.
    pub fn without(&self, card: Card) -> Hand {
        Hand {
            cards: self.cards.iter().copied().filter(|&c| c != card).collect(),
        }
    }

    /// A copy of this hand with `removed` taken out and `received` appended.
    pub fn exchanged(&self, removed: &[Card], received: &[Card]) -> Hand {
        let mut cards: Vec<Card> = self
            .cards
            .iter()
            .copied()
            .filter(|card| !removed.contains(card))
            .collect();
        cards.extend_from_slice(received);
        Hand { cards }
    }

    /// Cards sorted by suit then rank, for display.
    pub fn sorted(&self) -> Vec<Card> {
        let mut cards = self.cards.clone();
        cards.sort();
        cards
    }
}

impl From<Vec<Card>> for Hand {
    fn from(cards: Vec<Card>) -> Self {
        Hand::with_cards(cards)
    }
}
