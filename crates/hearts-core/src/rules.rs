//! Stateless legality and scoring checks shared by the transitions and the bots.

use crate::error::GameError;
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::player::PlayerPosition;
use crate::model::suit::Suit;
use crate::model::trick::Trick;

/// Round context needed to decide legality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayFlags {
    pub hearts_broken: bool,
    /// The very first lead of the round; forces the two of clubs when held.
    pub first_lead: bool,
    /// No trick of this round has completed yet. Point cards are still
    /// allowed when void in the led suit.
    pub first_trick: bool,
}

/// Cards `hand` may play into `trick`, in hand order.
pub fn legal_plays(hand: &Hand, trick: &Trick, flags: PlayFlags) -> Vec<Card> {
    if hand.is_empty() {
        return Vec::new();
    }

    if flags.first_lead && hand.contains(Card::TWO_OF_CLUBS) {
        return vec![Card::TWO_OF_CLUBS];
    }

    match trick.lead_suit() {
        None => {
            let hearts_only = hand.iter().all(|card| card.suit == Suit::Hearts);
            if flags.hearts_broken || hearts_only {
                return hand.cards().to_vec();
            }
            hand.iter()
                .copied()
                .filter(|card| card.suit != Suit::Hearts)
                .collect()
        }
        Some(lead) => {
            let following: Vec<Card> = hand
                .iter()
                .copied()
                .filter(|card| card.suit == lead)
                .collect();
            if following.is_empty() {
                hand.cards().to_vec()
            } else {
                following
            }
        }
    }
}

pub fn is_legal_play(hand: &Hand, trick: &Trick, flags: PlayFlags, card: Card) -> bool {
    legal_plays(hand, trick, flags).contains(&card)
}

/// Seat holding the highest card of `lead_suit`.
pub fn trick_winner(trick: &Trick, lead_suit: Suit) -> Result<PlayerPosition, GameError> {
    if trick.is_empty() {
        return Err(GameError::MalformedTrick("empty trick has no winner"));
    }
    trick
        .plays()
        .iter()
        .filter(|play| play.card.suit == lead_suit)
        .max_by_key(|play| play.card.rank)
        .map(|play| play.seat)
        .ok_or(GameError::MalformedTrick("no card of the lead suit"))
}

pub fn trick_points(trick: &Trick) -> u32 {
    trick.penalty_total()
}

/// Exactly three distinct cards, all held.
pub fn is_valid_pass(hand: &Hand, cards: &[Card]) -> bool {
    if cards.len() != 3 {
        return false;
    }
    let distinct = cards
        .iter()
        .enumerate()
        .all(|(i, card)| !cards[..i].contains(card));
    distinct && cards.iter().all(|card| hand.contains(*card))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::rank::Rank;

    fn card(code: &str) -> Card {
        code.parse().unwrap()
    }

    fn hand(codes: &[&str]) -> Hand {
        Hand::with_cards(codes.iter().map(|code| card(code)).collect())
    }

    #[test]
    fn first_lead_forces_two_of_clubs() {
        let held = hand(&["2c", "Ac", "Qs", "5h"]);
        let flags = PlayFlags {
            first_lead: true,
            first_trick: true,
            ..PlayFlags::default()
        };
        assert_eq!(legal_plays(&held, &Trick::new(), flags), vec![Card::TWO_OF_CLUBS]);
    }

    #[test]
    fn hearts_cannot_lead_until_broken() {
        let held = hand(&["3c", "5h", "Kh"]);
        let unbroken = legal_plays(&held, &Trick::new(), PlayFlags::default());
        assert_eq!(unbroken, vec![card("3c")]);

        let broken = PlayFlags {
            hearts_broken: true,
            ..PlayFlags::default()
        };
        assert_eq!(legal_plays(&held, &Trick::new(), broken).len(), 3);
    }

    #[test]
    fn all_hearts_hand_may_lead_hearts() {
        let held = hand(&["5h", "Kh"]);
        assert_eq!(legal_plays(&held, &Trick::new(), PlayFlags::default()).len(), 2);
    }

    #[test]
    fn queen_of_spades_may_always_lead() {
        let held = hand(&["Qs", "9h"]);
        assert_eq!(
            legal_plays(&held, &Trick::new(), PlayFlags::default()),
            vec![Card::QUEEN_OF_SPADES]
        );
    }

    #[test]
    fn must_follow_suit_when_able() {
        let held = hand(&["3c", "9d", "Qs", "Ah"]);
        let trick = Trick::new().with_play(PlayerPosition::West, card("Kd"));
        assert_eq!(legal_plays(&held, &trick, PlayFlags::default()), vec![card("9d")]);
    }

    #[test]
    fn void_on_first_trick_may_dump_points() {
        let held = hand(&["9d", "Qs", "Ah"]);
        let trick = Trick::new().with_play(PlayerPosition::North, Card::TWO_OF_CLUBS);
        let flags = PlayFlags {
            first_trick: true,
            ..PlayFlags::default()
        };
        let legal = legal_plays(&held, &trick, flags);
        assert!(legal.contains(&Card::QUEEN_OF_SPADES));
        assert!(legal.contains(&card("Ah")));
    }

    #[test]
    fn empty_hand_has_no_plays() {
        assert!(legal_plays(&Hand::new(), &Trick::new(), PlayFlags::default()).is_empty());
    }

    #[test]
    fn winner_is_highest_lead_suit_card() {
        let trick = Trick::new()
            .with_play(PlayerPosition::North, card("10c"))
            .with_play(PlayerPosition::East, card("Qc"))
            .with_play(PlayerPosition::South, card("4c"))
            .with_play(PlayerPosition::West, card("As"));
        assert_eq!(trick_winner(&trick, Suit::Clubs), Ok(PlayerPosition::East));
        assert_eq!(trick_points(&trick), 0);
    }

    #[test]
    fn winner_rejects_malformed_tricks() {
        assert!(matches!(
            trick_winner(&Trick::new(), Suit::Clubs),
            Err(GameError::MalformedTrick(_))
        ));
        let trick = Trick::new().with_play(PlayerPosition::North, card("Ad"));
        assert!(trick_winner(&trick, Suit::Clubs).is_err());
    }

    #[test]
    fn points_count_hearts_and_queen() {
        let trick = Trick::new()
            .with_play(PlayerPosition::North, card("2h"))
            .with_play(PlayerPosition::East, Card::QUEEN_OF_SPADES)
            .with_play(PlayerPosition::South, card("Ah"))
            .with_play(PlayerPosition::West, card("3c"));
        assert_eq!(trick_points(&trick), 15);
    }

    #[test]
    fn pass_requires_three_distinct_held_cards() {
        let held = hand(&["2c", "3c", "4c", "5c"]);
        assert!(is_valid_pass(&held, &[card("2c"), card("3c"), card("4c")]));
        assert!(!is_valid_pass(&held, &[card("2c"), card("3c")]));
        assert!(!is_valid_pass(&held, &[card("2c"), card("2c"), card("3c")]));
        assert!(!is_valid_pass(
            &held,
            &[card("2c"), card("3c"), Card::new(Rank::Ace, Suit::Hearts)]
        ));
    }
}
