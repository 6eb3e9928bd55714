use crate::model::card::Card;
use crate::model::player::PlayerPosition;
use thiserror::Error;

/// Failures raised by the rules and transitions. Every variant is reported
/// before any new state is built, so the caller's state stays valid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid card code {0:?}")]
    InvalidCardCode(String),
    #[error("operation not allowed in the {actual} phase (expected {expected})")]
    WrongPhase {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("invalid pass for {seat}: select exactly 3 distinct cards from the hand")]
    InvalidPass { seat: PlayerPosition },
    #[error("it is {expected}'s turn, not {actual}'s")]
    NotYourTurn {
        expected: PlayerPosition,
        actual: PlayerPosition,
    },
    #[error("{card} is not in {seat}'s hand")]
    CardNotInHand { seat: PlayerPosition, card: Card },
    #[error("{card} is not a legal play for {seat}")]
    IllegalPlay { seat: PlayerPosition, card: Card },
    #[error("deck must contain 52 cards, got {0}")]
    DeckSizeMismatch(usize),
    #[error("no hand holds the two of clubs")]
    MissingTwoOfClubs,
    #[error("malformed trick: {0}")]
    MalformedTrick(&'static str),
    #[error("corrupt game state: {0}")]
    CorruptState(String),
}
