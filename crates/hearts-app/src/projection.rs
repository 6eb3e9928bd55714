use hearts_core::game::state::{GameState, Phase};
use hearts_core::model::card::Card;
use hearts_core::model::passing::PassingDirection;
use hearts_core::model::player::PlayerPosition;
use hearts_core::model::score::Winner;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    pub name: String,
    pub score: u32,
    pub card_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickCardView {
    pub seat: PlayerPosition,
    pub card: String,
}

/// What a front end shows for one seat: public table state plus that
/// seat's own hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    pub phase: Phase,
    pub round: u32,
    pub pass_direction: PassingDirection,
    pub seats: Vec<SeatView>,
    pub human_hand: Vec<String>,
    /// Empty unless the viewer is on turn in a live game.
    pub legal_plays: Vec<String>,
    pub current_trick: Vec<TrickCardView>,
    pub whose_turn: PlayerPosition,
    pub hearts_broken: bool,
    pub game_over: bool,
    pub winner: Option<Winner>,
}

impl TableView {
    pub fn project(state: &GameState, viewer: PlayerPosition, names: &[String; 4]) -> Self {
        let seats = PlayerPosition::LOOP
            .iter()
            .map(|seat| SeatView {
                name: names[seat.index()].clone(),
                score: state.scores()[seat.index()],
                card_count: state.hand(*seat).len(),
            })
            .collect();

        let on_turn = state.phase() == Phase::Playing
            && state.whose_turn() == viewer
            && !state.is_game_over();
        let legal_plays = if on_turn {
            codes(&state.legal_plays_for(viewer))
        } else {
            Vec::new()
        };

        Self {
            phase: state.phase(),
            round: state.round(),
            pass_direction: state.pass_direction(),
            seats,
            human_hand: codes(state.hand(viewer).cards()),
            legal_plays,
            current_trick: state
                .current_trick()
                .plays()
                .iter()
                .map(|play| TrickCardView {
                    seat: play.seat,
                    card: play.card.to_code(),
                })
                .collect(),
            whose_turn: state.whose_turn(),
            hearts_broken: state.hearts_broken(),
            game_over: state.is_game_over(),
            winner: state.winner(),
        }
    }
}

fn codes(cards: &[Card]) -> Vec<String> {
    cards.iter().map(|card| card.to_code()).collect()
}
