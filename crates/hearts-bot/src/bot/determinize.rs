use super::SearchError;
use super::tracker::UnseenTracker;
use hearts_core::game::state::GameState;
use hearts_core::model::card::Card;
use hearts_core::model::hand::Hand;
use hearts_core::model::player::PlayerPosition;
use rand::Rng;
use rand::seq::SliceRandom;

/// Samples one concrete layout of the hidden cards as seen from `seat`.
///
/// The seat's own hand and the visible trick stay exactly as they are.
/// Unseen cards are shuffled and dealt to the opponents at their public hand
/// sizes, honouring known voids, most constrained opponent first. When an
/// opponent's voids cannot be satisfied from what is left, that opponent
/// takes whatever remains instead.
pub fn determinize<R: Rng + ?Sized>(
    state: &GameState,
    seat: PlayerPosition,
    tracker: &UnseenTracker,
    rng: &mut R,
) -> Result<GameState, SearchError> {
    let mut pool = tracker.unseen_cards(state, seat);
    let opponents: Vec<PlayerPosition> = PlayerPosition::LOOP
        .iter()
        .copied()
        .filter(|other| *other != seat)
        .collect();

    let needed: usize = opponents.iter().map(|o| state.hand(*o).len()).sum();
    if pool.len() < needed {
        return Err(SearchError::InsufficientUnseen {
            needed,
            available: pool.len(),
        });
    }
    pool.shuffle(rng);

    let mut order = opponents;
    order.sort_by_key(|other| std::cmp::Reverse(tracker.void_count(*other)));

    let mut hands = state.hands().clone();
    let mut used = vec![false; pool.len()];
    for other in order {
        let want = state.hand(other).len();
        let fits = |card: &Card| !tracker.is_void(other, card.suit);
        let eligible = pool
            .iter()
            .enumerate()
            .filter(|(idx, card)| !used[*idx] && fits(card))
            .count();
        let relaxed = eligible < want;

        let mut dealt = Vec::with_capacity(want);
        for (idx, card) in pool.iter().enumerate() {
            if dealt.len() == want {
                break;
            }
            if used[idx] || (!relaxed && !fits(card)) {
                continue;
            }
            used[idx] = true;
            dealt.push(*card);
        }
        hands[other.index()] = Hand::with_cards(dealt);
    }

    let mut parts = state.clone().into_parts();
    parts.hands = hands;
    Ok(GameState::from_parts(parts)?)
}
