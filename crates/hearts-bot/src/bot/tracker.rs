use hearts_core::game::state::GameState;
use hearts_core::model::card::Card;
use hearts_core::model::deck::Deck;
use hearts_core::model::player::PlayerPosition;
use hearts_core::model::suit::Suit;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Public knowledge for the current round: which cards have hit the table
/// and which suits each seat is known to be out of.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnseenTracker {
    round: Option<u32>,
    seen: BTreeSet<Card>,
    // seat_idx x suit_idx
    voids: [[bool; 4]; 4],
}

impl UnseenTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn round(&self) -> Option<u32> {
        self.round
    }

    pub fn reset_for_round(&mut self, round: u32) {
        self.round = Some(round);
        self.seen.clear();
        self.voids = [[false; 4]; 4];
    }

    fn sync_round(&mut self, round: u32) {
        if self.round != Some(round) {
            self.reset_for_round(round);
        }
    }

    /// Records `seat` playing `card` into `before`, the state prior to the play.
    pub fn observe_play(&mut self, before: &GameState, seat: PlayerPosition, card: Card) {
        self.sync_round(before.round());
        if let Some(lead) = before.current_trick().lead_suit() {
            if card.suit != lead {
                self.note_void(seat, lead);
            }
        }
        self.seen.insert(card);
    }

    /// Re-scans the visible trick; safe to call repeatedly.
    pub fn observe_state(&mut self, state: &GameState) {
        self.sync_round(state.round());
        let trick = state.current_trick();
        if let Some(lead) = trick.lead_suit() {
            for play in trick.plays().iter().skip(1) {
                if play.card.suit != lead {
                    self.note_void(play.seat, lead);
                }
            }
        }
        self.seen.extend(trick.cards());
    }

    pub fn note_void(&mut self, seat: PlayerPosition, suit: Suit) {
        self.voids[seat.index()][suit.index()] = true;
    }

    pub fn is_void(&self, seat: PlayerPosition, suit: Suit) -> bool {
        self.voids[seat.index()][suit.index()]
    }

    pub fn void_count(&self, seat: PlayerPosition) -> usize {
        self.voids[seat.index()].iter().filter(|&&void| void).count()
    }

    pub fn is_seen(&self, card: Card) -> bool {
        self.seen.contains(&card)
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Cards `seat` cannot locate: the deck minus its own hand, the trick on
    /// the table and everything already seen. Returned in deck order.
    pub fn unseen_cards(&self, state: &GameState, seat: PlayerPosition) -> Vec<Card> {
        let hand = state.hand(seat);
        let trick = state.current_trick();
        Deck::standard()
            .cards()
            .iter()
            .copied()
            .filter(|card| !hand.contains(*card) && !trick.contains(*card) && !self.is_seen(*card))
            .collect()
    }

    pub fn unseen_count(&self, state: &GameState, seat: PlayerPosition) -> usize {
        self.unseen_cards(state, seat).len()
    }
}

#[cfg(test)]
mod tests {
    use super::UnseenTracker;
    use hearts_core::game::state::GameState;
    use hearts_core::game::transitions::{apply_play, deal_new_round, deal_shuffled_round};
    use hearts_core::model::card::Card;
    use hearts_core::model::deck::Deck;
    use hearts_core::model::player::PlayerPosition;
    use hearts_core::model::suit::Suit;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn no_pass_round() -> GameState {
        deal_new_round([0; 4], 4, Deck::standard().deal().unwrap()).unwrap()
    }

    fn play_first_legal(state: &GameState, tracker: &mut UnseenTracker) -> GameState {
        let seat = state.whose_turn();
        let card = state.legal_plays_for(seat)[0];
        tracker.observe_play(state, seat, card);
        apply_play(state, seat, card).unwrap()
    }

    #[test]
    fn fresh_round_sees_only_own_hand() {
        let state = no_pass_round();
        let mut tracker = UnseenTracker::new();
        tracker.observe_state(&state);
        assert_eq!(tracker.unseen_count(&state, PlayerPosition::North), 39);
        assert_eq!(tracker.round(), Some(4));
    }

    #[test]
    fn plays_are_removed_from_unseen() {
        let mut tracker = UnseenTracker::new();
        let mut state = no_pass_round();
        for _ in 0..6 {
            state = play_first_legal(&state, &mut tracker);
        }
        assert_eq!(tracker.seen_count(), 6);
        let unseen = tracker.unseen_cards(&state, PlayerPosition::South);
        assert!(!unseen.contains(&Card::TWO_OF_CLUBS));
        let held: usize = PlayerPosition::LOOP
            .iter()
            .filter(|seat| **seat != PlayerPosition::South)
            .map(|seat| state.hand(*seat).len())
            .sum();
        assert_eq!(unseen.len(), held);
    }

    #[test]
    fn failing_to_follow_marks_void() {
        let state = no_pass_round();
        let mut tracker = UnseenTracker::new();
        let before = apply_play(&state, PlayerPosition::North, Card::TWO_OF_CLUBS).unwrap();
        tracker.observe_play(&state, PlayerPosition::North, Card::TWO_OF_CLUBS);
        tracker.observe_play(&before, PlayerPosition::East, "Qh".parse().unwrap());
        assert!(tracker.is_void(PlayerPosition::East, Suit::Clubs));
        assert!(!tracker.is_void(PlayerPosition::North, Suit::Clubs));
        assert_eq!(tracker.void_count(PlayerPosition::East), 1);
    }

    #[test]
    fn new_round_resets_knowledge() {
        let mut tracker = UnseenTracker::new();
        let state = no_pass_round();
        let next = play_first_legal(&state, &mut tracker);
        tracker.note_void(PlayerPosition::West, Suit::Hearts);
        assert_eq!(tracker.seen_count(), 1);

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let fresh = deal_shuffled_round(*next.scores(), 5, &mut rng).unwrap();
        tracker.observe_state(&fresh);
        assert_eq!(tracker.seen_count(), 0);
        assert!(!tracker.is_void(PlayerPosition::West, Suit::Hearts));
    }

    #[test]
    fn serde_roundtrip_keeps_voids() {
        let mut tracker = UnseenTracker::new();
        tracker.reset_for_round(2);
        tracker.note_void(PlayerPosition::South, Suit::Spades);
        let json = serde_json::to_string(&tracker).unwrap();
        let back: UnseenTracker = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tracker);
    }
}
