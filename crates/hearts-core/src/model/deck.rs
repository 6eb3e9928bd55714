use crate::error::GameError;
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::seq::SliceRandom;
use std::array;

pub const DECK_SIZE: usize = 52;
pub const HAND_SIZE: usize = 13;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// All 52 cards, clubs through hearts, two through ace.
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL.iter().copied() {
            for rank in Rank::ORDERED.iter().copied() {
                cards.push(Card::new(rank, suit));
            }
        }
        Self { cards }
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// A reordered copy; `self` keeps its order.
    pub fn shuffled<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let mut cards = self.cards.clone();
        cards.shuffle(rng);
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn deal(&self) -> Result<[Hand; 4], GameError> {
        deal_into_four_hands(&self.cards)
    }
}

/// Deals one card at a time round-robin, seat 0 first.
pub fn deal_into_four_hands(cards: &[Card]) -> Result<[Hand; 4], GameError> {
    if cards.len() != DECK_SIZE {
        return Err(GameError::DeckSizeMismatch(cards.len()));
    }
    Ok(array::from_fn(|seat| {
        Hand::with_cards(cards.iter().skip(seat).step_by(4).copied().collect())
    }))
}
