use super::first_max_by_key;
use hearts_core::game::state::GameState;
use hearts_core::model::card::Card;
use hearts_core::model::player::PlayerPosition;
use hearts_core::model::rank::Rank;
use hearts_core::model::suit::Suit;

/// Rule-of-thumb card play: lead low from long safe suits, duck under the
/// current winner, and unload points when void.
pub struct PlayPlanner;

impl PlayPlanner {
    pub fn choose(state: &GameState, seat: PlayerPosition, legal: &[Card]) -> Option<Card> {
        match legal {
            [] => None,
            [only] => Some(*only),
            _ => match state.current_trick().lead_suit() {
                None => Self::lead(state, seat, legal),
                Some(lead) => {
                    let in_suit: Vec<Card> =
                        legal.iter().copied().filter(|c| c.suit == lead).collect();
                    if in_suit.is_empty() {
                        Self::dump(legal)
                    } else {
                        Self::follow(state, lead, &in_suit)
                    }
                }
            },
        }
    }

    fn lead(state: &GameState, seat: PlayerPosition, legal: &[Card]) -> Option<Card> {
        let queen_live = queen_may_be_out(state, seat);
        let present = |suit: Suit| legal.iter().any(|c| c.suit == suit);

        let mut order: Vec<Suit> = Vec::with_capacity(4);
        for suit in [Suit::Clubs, Suit::Diamonds] {
            if present(suit) {
                order.push(suit);
            }
        }
        if !queen_live && present(Suit::Spades) {
            order.push(Suit::Spades);
        }
        if state.hearts_broken() && present(Suit::Hearts) {
            order.push(Suit::Hearts);
        }
        for suit in [Suit::Spades, Suit::Hearts] {
            if present(suit) && !order.contains(&suit) {
                order.push(suit);
            }
        }

        let count = |suit: &Suit| legal.iter().filter(|c| c.suit == *suit).count();
        let suit = first_max_by_key(order.into_iter(), count)?;
        let in_suit = legal.iter().copied().filter(|c| c.suit == suit);
        in_suit
            .clone()
            .filter(|c| !c.is_queen_of_spades())
            .min_by_key(|c| c.rank)
            .or_else(|| in_suit.min_by_key(|c| c.rank))
    }

    fn follow(state: &GameState, lead: Suit, in_suit: &[Card]) -> Option<Card> {
        let high = state
            .current_trick()
            .cards()
            .filter(|c| c.suit == lead)
            .map(|c| c.rank)
            .max();
        let under = in_suit
            .iter()
            .copied()
            .filter(|c| high.is_some_and(|h| c.rank < h))
            .max_by_key(|c| c.rank);
        under.or_else(|| in_suit.iter().copied().max_by_key(|c| c.rank))
    }

    fn dump(legal: &[Card]) -> Option<Card> {
        if legal.contains(&Card::QUEEN_OF_SPADES) {
            return Some(Card::QUEEN_OF_SPADES);
        }
        let hearts = legal.iter().copied().filter(|c| c.suit == Suit::Hearts);
        if let Some(card) = hearts.max_by_key(|c| c.rank) {
            return Some(card);
        }
        let high_spades = legal
            .iter()
            .copied()
            .filter(|c| c.suit == Suit::Spades && c.rank > Rank::Queen);
        if let Some(card) = high_spades.max_by_key(|c| c.rank) {
            return Some(card);
        }
        first_max_by_key(legal.iter().copied(), |c| c.rank)
    }
}

/// Whether the queen of spades could still land on a trick: not in our hand,
/// not on the table, and nobody has banked 13+ points this round.
pub fn queen_may_be_out(state: &GameState, seat: PlayerPosition) -> bool {
    if state.hand(seat).contains(Card::QUEEN_OF_SPADES) {
        return false;
    }
    if state.current_trick().contains(Card::QUEEN_OF_SPADES) {
        return false;
    }
    !state.round_scores().iter().any(|&points| points >= 13)
}
