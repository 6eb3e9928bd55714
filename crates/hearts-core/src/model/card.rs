use crate::error::GameError;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// A playing card. Ordering is suit-major, then rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub const TWO_OF_CLUBS: Card = Card::new(Rank::Two, Suit::Clubs);
    pub const QUEEN_OF_SPADES: Card = Card::new(Rank::Queen, Suit::Spades);

    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { suit, rank }
    }

    /// The card that opens every round.
    pub const fn two_of_clubs() -> Self {
        Self::TWO_OF_CLUBS
    }

    pub const fn is_penalty(self) -> bool {
        matches!(self.suit, Suit::Hearts) || self.is_queen_of_spades()
    }

    pub const fn is_queen_of_spades(self) -> bool {
        matches!(self.rank, Rank::Queen) && matches!(self.suit, Suit::Spades)
    }

    pub fn penalty_value(self) -> u32 {
        if self.is_queen_of_spades() {
            13
        } else if self.suit == Suit::Hearts {
            1
        } else {
            0
        }
    }

    pub fn to_code(self) -> String {
        self.to_string()
    }

    /// Parses codes such as `"2c"`, `"10d"`, `"Qs"`. Surrounding whitespace is ignored.
    pub fn from_code(code: &str) -> Result<Self, GameError> {
        let trimmed = code.trim();
        let invalid = || GameError::InvalidCardCode(code.to_string());
        let suit_letter = trimmed.chars().last().ok_or_else(invalid)?;
        let suit = Suit::from_code(suit_letter).ok_or_else(invalid)?;
        let rank_token = &trimmed[..trimmed.len() - suit_letter.len_utf8()];
        let rank = Rank::from_token(rank_token).ok_or_else(invalid)?;
        Ok(Card::new(rank, suit))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl FromStr for Card {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Card::from_code(s)
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Card::from_code(&code).map_err(serde::de::Error::custom)
    }
}
