//! Pure transitions. Each function validates everything first and then builds
//! a fresh [`GameState`]; on error the input is untouched.

use crate::error::GameError;
use crate::game::state::{GameState, GameStateParts, Phase, two_of_clubs_holder};
use crate::model::card::Card;
use crate::model::deck::{Deck, HAND_SIZE};
use crate::model::hand::Hand;
use crate::model::passing::PassingDirection;
use crate::model::player::PlayerPosition;
use crate::model::score::ScoreBoard;
use crate::model::trick::Trick;
use crate::rules;
use rand::Rng;
use std::array;

/// Exchanges the four passes and opens play with the holder of the two of clubs.
/// `passes[i]` are the cards seat `i` gives away.
pub fn apply_passes(state: &GameState, passes: &[[Card; 3]; 4]) -> Result<GameState, GameError> {
    if state.phase != Phase::Passing {
        return Err(wrong_phase(Phase::Passing, state.phase));
    }
    for seat in PlayerPosition::LOOP {
        if !rules::is_valid_pass(state.hand(seat), &passes[seat.index()]) {
            return Err(GameError::InvalidPass { seat });
        }
    }

    let direction = state.pass_direction;
    let hands: [Hand; 4] = if direction.requires_selection() {
        array::from_fn(|index| {
            let seat = PlayerPosition::LOOP[index];
            let giver = direction.source(seat);
            state.hands[index].exchanged(&passes[index], &passes[giver.index()])
        })
    } else {
        state.hands.clone()
    };

    let leader = two_of_clubs_holder(&hands).ok_or(GameError::MissingTwoOfClubs)?;
    Ok(GameState {
        phase: Phase::Playing,
        hands,
        current_trick: Trick::new(),
        whose_turn: leader,
        hearts_broken: false,
        ..state.clone()
    })
}

/// Plays `card` for `seat`, resolving the trick when it is the fourth card.
pub fn apply_play(
    state: &GameState,
    seat: PlayerPosition,
    card: Card,
) -> Result<GameState, GameError> {
    if state.phase != Phase::Playing {
        return Err(wrong_phase(Phase::Playing, state.phase));
    }
    if state.whose_turn != seat {
        return Err(GameError::NotYourTurn {
            expected: state.whose_turn,
            actual: seat,
        });
    }
    let hand = state.hand(seat);
    if !hand.contains(card) {
        return Err(GameError::CardNotInHand { seat, card });
    }
    if !rules::is_legal_play(hand, &state.current_trick, state.play_flags(seat), card) {
        return Err(GameError::IllegalPlay { seat, card });
    }

    let mut hands = state.hands.clone();
    hands[seat.index()] = hand.without(card);
    let trick = state.current_trick.with_play(seat, card);
    let hearts_broken = state.hearts_broken || card.is_penalty();

    if !trick.is_complete() {
        return Ok(GameState {
            hands,
            current_trick: trick,
            whose_turn: seat.next(),
            hearts_broken,
            ..state.clone()
        });
    }

    let lead = trick
        .lead_suit()
        .ok_or(GameError::MalformedTrick("complete trick without a lead"))?;
    let winner = rules::trick_winner(&trick, lead)?;
    let mut round_scores = state.round_scores;
    round_scores[winner.index()] += rules::trick_points(&trick);

    Ok(GameState {
        hands,
        current_trick: Trick::new(),
        whose_turn: winner,
        round_scores,
        hearts_broken,
        ..state.clone()
    })
}

/// Folds the round's points into the totals and decides whether the game is over.
pub fn apply_round_scoring(state: &GameState) -> GameState {
    let board = ScoreBoard::from_totals(state.scores).apply_round(state.round_scores);
    let game_over = board.is_game_over();
    GameState {
        scores: *board.standings(),
        round_scores: [0; 4],
        game_over,
        winner: game_over.then(|| board.winner()),
        ..state.clone()
    }
}

/// Opens `round` with freshly dealt `hands`. Rounds divisible by four skip
/// passing and start with the two of clubs holder on lead.
pub fn deal_new_round(
    previous_scores: [u32; 4],
    round: u32,
    hands: [Hand; 4],
) -> Result<GameState, GameError> {
    if round == 0 {
        return Err(GameError::CorruptState("round numbers start at 1".into()));
    }
    let dealt: usize = hands.iter().map(Hand::len).sum();
    if hands.iter().any(|hand| hand.len() != HAND_SIZE) {
        return Err(GameError::DeckSizeMismatch(dealt));
    }

    let direction = PassingDirection::for_round(round);
    let (phase, whose_turn) = if direction.requires_selection() {
        (Phase::Passing, PlayerPosition::North)
    } else {
        let leader = two_of_clubs_holder(&hands).ok_or(GameError::MissingTwoOfClubs)?;
        (Phase::Playing, leader)
    };

    GameState::from_parts(GameStateParts {
        round,
        phase,
        pass_direction: direction,
        hands,
        current_trick: Trick::new(),
        whose_turn,
        scores: previous_scores,
        round_scores: [0; 4],
        hearts_broken: false,
        game_over: false,
        winner: None,
    })
}

/// Shuffles a fresh deck with `rng` and deals `round`.
pub fn deal_shuffled_round<R: Rng + ?Sized>(
    previous_scores: [u32; 4],
    round: u32,
    rng: &mut R,
) -> Result<GameState, GameError> {
    let hands = Deck::standard().shuffled(rng).deal()?;
    deal_new_round(previous_scores, round, hands)
}

/// First round of a new game.
pub fn new_game<R: Rng + ?Sized>(rng: &mut R) -> Result<GameState, GameError> {
    deal_shuffled_round([0; 4], 1, rng)
}

fn wrong_phase(expected: Phase, actual: Phase) -> GameError {
    GameError::WrongPhase {
        expected: expected.as_str(),
        actual: actual.as_str(),
    }
}
