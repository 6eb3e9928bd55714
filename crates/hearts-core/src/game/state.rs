use crate::error::GameError;
use crate::model::card::Card;
use crate::model::deck::{DECK_SIZE, HAND_SIZE};
use crate::model::hand::Hand;
use crate::model::passing::PassingDirection;
use crate::model::player::PlayerPosition;
use crate::model::score::{ROUND_PENALTY_TOTAL, Winner};
use crate::model::trick::Trick;
use crate::rules::{self, PlayFlags};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Passing,
    Playing,
}

impl Phase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Passing => "passing",
            Phase::Playing => "playing",
        }
    }
}

/// Snapshot of a game between transitions. Values are never mutated in
/// place; every transition in [`crate::game::transitions`] builds a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GameStateParts", into = "GameStateParts")]
pub struct GameState {
    pub(crate) round: u32,
    pub(crate) phase: Phase,
    pub(crate) pass_direction: PassingDirection,
    pub(crate) hands: [Hand; 4],
    pub(crate) current_trick: Trick,
    pub(crate) whose_turn: PlayerPosition,
    pub(crate) scores: [u32; 4],
    pub(crate) round_scores: [u32; 4],
    pub(crate) hearts_broken: bool,
    pub(crate) game_over: bool,
    pub(crate) winner: Option<Winner>,
}

/// Unchecked field set. Turning it into a [`GameState`] validates the
/// card-conservation and turn invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateParts {
    pub round: u32,
    pub phase: Phase,
    pub pass_direction: PassingDirection,
    pub hands: [Hand; 4],
    pub current_trick: Trick,
    pub whose_turn: PlayerPosition,
    pub scores: [u32; 4],
    pub round_scores: [u32; 4],
    pub hearts_broken: bool,
    pub game_over: bool,
    pub winner: Option<Winner>,
}

impl GameState {
    pub fn from_parts(parts: GameStateParts) -> Result<GameState, GameError> {
        GameState::try_from(parts)
    }

    pub fn into_parts(self) -> GameStateParts {
        GameStateParts::from(self)
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pass_direction(&self) -> PassingDirection {
        self.pass_direction
    }

    pub fn hands(&self) -> &[Hand; 4] {
        &self.hands
    }

    pub fn hand(&self, seat: PlayerPosition) -> &Hand {
        &self.hands[seat.index()]
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current_trick
    }

    pub fn whose_turn(&self) -> PlayerPosition {
        self.whose_turn
    }

    pub fn scores(&self) -> &[u32; 4] {
        &self.scores
    }

    pub fn round_scores(&self) -> &[u32; 4] {
        &self.round_scores
    }

    pub fn hearts_broken(&self) -> bool {
        self.hearts_broken
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    /// Cards still held plus cards on the table.
    pub fn cards_in_play(&self) -> usize {
        self.hands.iter().map(Hand::len).sum::<usize>() + self.current_trick.len()
    }

    pub fn tricks_completed(&self) -> usize {
        (DECK_SIZE - self.cards_in_play()) / 4
    }

    /// True until the first trick of the round has been resolved.
    pub fn is_first_trick(&self) -> bool {
        let held: usize = self.hands.iter().map(Hand::len).sum();
        DECK_SIZE - held < 4
    }

    /// True when `seat` is about to make the opening lead of the round.
    pub fn is_first_lead(&self, seat: PlayerPosition) -> bool {
        self.current_trick.is_empty()
            && self.is_first_trick()
            && self.hand(seat).contains(Card::TWO_OF_CLUBS)
    }

    pub fn play_flags(&self, seat: PlayerPosition) -> PlayFlags {
        PlayFlags {
            hearts_broken: self.hearts_broken,
            first_lead: self.is_first_lead(seat),
            first_trick: self.is_first_trick(),
        }
    }

    pub fn legal_plays_for(&self, seat: PlayerPosition) -> Vec<Card> {
        rules::legal_plays(self.hand(seat), &self.current_trick, self.play_flags(seat))
    }

    pub fn is_round_complete(&self) -> bool {
        self.hands.iter().all(Hand::is_empty) && self.current_trick.is_empty()
    }

    /// Seat holding the two of clubs.
    pub fn two_of_clubs_holder(&self) -> Option<PlayerPosition> {
        two_of_clubs_holder(&self.hands)
    }
}

pub(crate) fn two_of_clubs_holder(hands: &[Hand; 4]) -> Option<PlayerPosition> {
    PlayerPosition::LOOP
        .iter()
        .copied()
        .find(|seat| hands[seat.index()].contains(Card::TWO_OF_CLUBS))
}

impl From<GameState> for GameStateParts {
    fn from(state: GameState) -> Self {
        GameStateParts {
            round: state.round,
            phase: state.phase,
            pass_direction: state.pass_direction,
            hands: state.hands,
            current_trick: state.current_trick,
            whose_turn: state.whose_turn,
            scores: state.scores,
            round_scores: state.round_scores,
            hearts_broken: state.hearts_broken,
            game_over: state.game_over,
            winner: state.winner,
        }
    }
}

impl TryFrom<GameStateParts> for GameState {
    type Error = GameError;

    fn try_from(parts: GameStateParts) -> Result<Self, Self::Error> {
        let corrupt = |msg: String| Err(GameError::CorruptState(msg));

        if parts.round == 0 {
            return corrupt("round numbers start at 1".into());
        }
        if parts.game_over != parts.winner.is_some() {
            return corrupt("winner must be set exactly when the game is over".into());
        }
        if parts.round_scores.iter().sum::<u32>() > ROUND_PENALTY_TOTAL {
            return corrupt("round scores exceed 26 points".into());
        }

        let mut seen = HashSet::with_capacity(DECK_SIZE);
        let held = parts.hands.iter().flat_map(Hand::iter).copied();
        for card in held.chain(parts.current_trick.cards()) {
            if !seen.insert(card) {
                return corrupt(format!("{card} appears twice"));
            }
        }

        if parts.current_trick.len() >= 4 {
            return corrupt("current trick holds four cards".into());
        }
        let trick_seats: Vec<PlayerPosition> =
            parts.current_trick.plays().iter().map(|p| p.seat).collect();
        if let Some(&leader) = trick_seats.first() {
            for (step, seat) in trick_seats.iter().enumerate() {
                if *seat != leader.offset(step) {
                    return corrupt("current trick is out of seat order".into());
                }
            }
        }

        let in_play = parts.hands.iter().map(Hand::len).sum::<usize>() + parts.current_trick.len();
        if in_play > DECK_SIZE || (DECK_SIZE - in_play) % 4 != 0 {
            return corrupt(format!("{in_play} cards in play is not a trick boundary"));
        }
        let completed = (DECK_SIZE - in_play) / 4;
        for seat in PlayerPosition::LOOP {
            let played = HAND_SIZE.checked_sub(parts.hands[seat.index()].len());
            let expected = completed + usize::from(trick_seats.contains(&seat));
            if played != Some(expected) {
                return corrupt(format!("{seat} holds the wrong number of cards"));
            }
        }

        match parts.phase {
            Phase::Passing => {
                if completed != 0 || !parts.current_trick.is_empty() {
                    return corrupt("cards were played during the passing phase".into());
                }
            }
            Phase::Playing => {
                let expected_turn = trick_seats.last().map(|seat| seat.next());
                if let Some(expected) = expected_turn {
                    if expected != parts.whose_turn {
                        return corrupt(format!("turn should be {expected}"));
                    }
                }
            }
        }

        Ok(GameState {
            round: parts.round,
            phase: parts.phase,
            pass_direction: parts.pass_direction,
            hands: parts.hands,
            current_trick: parts.current_trick,
            whose_turn: parts.whose_turn,
            scores: parts.scores,
            round_scores: parts.round_scores,
            hearts_broken: parts.hearts_broken,
            game_over: parts.game_over,
            winner: parts.winner,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::deck::Deck;

    fn fresh_parts() -> GameStateParts {
        GameStateParts {
            round: 1,
            phase: Phase::Passing,
            pass_direction: PassingDirection::Left,
            hands: Deck::standard().deal().unwrap(),
            current_trick: Trick::new(),
            whose_turn: PlayerPosition::North,
            scores: [0; 4],
            round_scores: [0; 4],
            hearts_broken: false,
            game_over: false,
            winner: None,
        }
    }

    #[test]
    fn fresh_deal_is_valid() {
        let state = GameState::from_parts(fresh_parts()).unwrap();
        assert_eq!(state.cards_in_play(), 52);
        assert_eq!(state.tricks_completed(), 0);
        assert!(state.is_first_trick());
        assert_eq!(state.two_of_clubs_holder(), Some(PlayerPosition::North));
    }

    #[test]
    fn duplicate_cards_are_rejected() {
        let mut parts = fresh_parts();
        let stolen = parts.hands[1].cards()[0];
        let mut cards = parts.hands[0].cards().to_vec();
        cards[0] = stolen;
        parts.hands[0] = Hand::with_cards(cards);
        assert!(matches!(
            GameState::from_parts(parts),
            Err(GameError::CorruptState(_))
        ));
    }

    #[test]
    fn winner_must_match_game_over() {
        let mut parts = fresh_parts();
        parts.game_over = true;
        assert!(GameState::from_parts(parts).is_err());
    }

    #[test]
    fn trick_turn_must_follow_last_play() {
        let mut parts = fresh_parts();
        parts.phase = Phase::Playing;
        let card = Card::TWO_OF_CLUBS;
        parts.hands[0] = parts.hands[0].without(card);
        parts.current_trick = Trick::new().with_play(PlayerPosition::North, card);
        parts.whose_turn = PlayerPosition::South;
        assert!(GameState::from_parts(parts.clone()).is_err());
        parts.whose_turn = PlayerPosition::East;
        let state = GameState::from_parts(parts).unwrap();
        assert!(!state.is_first_lead(PlayerPosition::East));
        assert!(state.is_first_trick());
    }

    #[test]
    fn json_round_trip_preserves_state() {
        let state = GameState::from_parts(fresh_parts()).unwrap();
        let json = serde_json::to_string(&state).unwrap();
        let restored: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }
}
