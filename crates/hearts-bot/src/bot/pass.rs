use hearts_core::model::card::Card;
use hearts_core::model::hand::Hand;
use hearts_core::model::rank::Rank;
use hearts_core::model::suit::Suit;

pub struct PassPlanner;

impl PassPlanner {
    /// Three most dangerous cards to keep, ranked by [`pass_danger`].
    pub fn danger_ranked(hand: &Hand) -> Option<[Card; 3]> {
        if hand.len() < 3 {
            return None;
        }
        let mut ranked: Vec<(Card, f32)> = hand
            .iter()
            .map(|&card| (card, pass_danger(card, hand)))
            .collect();
        // Stable, so equal scores keep hand order.
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        Some([ranked[0].0, ranked[1].0, ranked[2].0])
    }

    /// Tries every three-card subset and keeps the one leaving the safest
    /// hand. Earlier subsets win ties.
    pub fn safest_remaining(hand: &Hand) -> Option<[Card; 3]> {
        let cards = hand.cards();
        let n = cards.len();
        if n < 3 {
            return None;
        }
        let mut best: Option<([Card; 3], f32)> = None;
        let mut remaining = Vec::with_capacity(n - 3);
        for i in 0..n {
            for j in (i + 1)..n {
                for k in (j + 1)..n {
                    remaining.clear();
                    remaining.extend(
                        cards
                            .iter()
                            .enumerate()
                            .filter(|(idx, _)| *idx != i && *idx != j && *idx != k)
                            .map(|(_, card)| *card),
                    );
                    let danger = hand_danger(&remaining);
                    if best.is_none_or(|(_, score)| danger < score) {
                        best = Some(([cards[i], cards[j], cards[k]], danger));
                    }
                }
            }
        }
        best.map(|(selection, _)| selection)
    }
}

/// How badly `card` wants to leave `hand`; higher passes first.
pub fn pass_danger(card: Card, hand: &Hand) -> f32 {
    if card.is_queen_of_spades() {
        return 200.0;
    }
    if card.suit == Suit::Spades && card.rank > Rank::Queen {
        return 150.0 + f32::from(card.rank.value());
    }

    let mut score = f32::from(card.rank.value());
    if card.suit == Suit::Hearts {
        score += 50.0;
    }
    let suit_len = hand.count_suit(card.suit);
    if suit_len <= 2 {
        score += 30.0;
    } else if suit_len <= 3 {
        score += 15.0;
    }
    score
}

/// Liability of holding `cards` for the rest of the round; lower is safer.
pub fn hand_danger(cards: &[Card]) -> f32 {
    let mut score = 0.0f32;

    if cards.contains(&Card::QUEEN_OF_SPADES) {
        let low_spades = cards
            .iter()
            .filter(|c| c.suit == Suit::Spades && c.rank < Rank::Queen)
            .count() as f32;
        score += (15.0 - low_spades * 2.0).max(5.0);
    }

    for card in cards {
        match card.suit {
            Suit::Spades if card.rank > Rank::Queen => score += 10.0,
            Suit::Hearts if card.rank.value() > 6 => {
                score += f32::from(card.rank.value() - 6) * 0.8;
            }
            _ => {}
        }
    }

    let mut counts = [0usize; 4];
    for card in cards {
        counts[card.suit.index()] += 1;
    }
    let missing = counts.iter().filter(|&&count| count == 0).count() as f32;
    score -= missing * 5.0;
    for count in counts {
        match count {
            1 => score -= 3.0,
            2 => score -= 1.0,
            _ => {}
        }
    }

    score
}
