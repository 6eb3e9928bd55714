use super::{PassStrategy, PlayContext, PlayStrategy, format_cards};
use crate::bot::{PassPlanner, PlayPlanner, hand_danger};
use hearts_core::model::card::Card;
use hearts_core::model::hand::Hand;
use hearts_core::model::passing::PassingDirection;
use hearts_core::model::player::PlayerPosition;
use rand::RngCore;
use tracing::{Level, event};

/// Passes the three most dangerous cards by the danger ranking.
pub struct HeuristicPass;

/// Rule-based play: safe leads, ducking under the winner, dumping points
/// when void.
pub struct HeuristicPlay;

impl PassStrategy for HeuristicPass {
    fn choose_pass(
        &mut self,
        seat: PlayerPosition,
        hand: &Hand,
        direction: PassingDirection,
        _rng: &mut dyn RngCore,
    ) -> [Card; 3] {
        let selection = PassPlanner::danger_ranked(hand).expect("PassPlanner returns valid pass");
        log_pass_decision(seat, "medium", direction, &selection);
        selection
    }
}

impl PlayStrategy for HeuristicPlay {
    fn choose_play(&mut self, ctx: &PlayContext<'_>, _rng: &mut dyn RngCore) -> Card {
        let card = PlayPlanner::choose(ctx.state, ctx.seat, ctx.legal)
            .expect("no legal plays offered to the heuristic");
        log_play_decision(ctx, "medium", card, None);
        card
    }
}

pub(super) fn log_pass_decision(
    seat: PlayerPosition,
    difficulty: &'static str,
    direction: PassingDirection,
    selection: &[Card; 3],
) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    event!(
        target: "hearts_bot::pass",
        Level::DEBUG,
        seat = ?seat,
        difficulty,
        direction = direction.as_str(),
        danger = hand_danger(selection),
        cards = %format_cards(selection),
    );
}

pub(super) fn log_play_decision(
    ctx: &PlayContext<'_>,
    difficulty: &'static str,
    chosen: Card,
    expected_cost: Option<f64>,
) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let legal_preview = if ctx.legal.len() <= 6 {
        format_cards(ctx.legal)
    } else {
        format!("{} moves", ctx.legal.len())
    };

    event!(
        target: "hearts_bot::play",
        Level::DEBUG,
        seat = ?ctx.seat,
        difficulty,
        legal_count = ctx.legal.len(),
        legal_moves = %legal_preview,
        chosen = %chosen,
        expected_cost = ?expected_cost,
        hearts_broken = ctx.state.hearts_broken(),
        trick_cards = ctx.state.current_trick().len(),
    );
}

#[cfg(test)]
mod tests {
    use super::{HeuristicPass, HeuristicPlay};
    use crate::bot::UnseenTracker;
    use crate::policy::{PassStrategy, PlayContext, PlayStrategy};
    use hearts_core::game::state::{GameState, GameStateParts, Phase};
    use hearts_core::model::card::Card;
    use hearts_core::model::hand::Hand;
    use hearts_core::model::passing::PassingDirection;
    use hearts_core::model::player::PlayerPosition;
    use hearts_core::model::trick::Trick;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn cards(codes: &[&str]) -> Vec<Card> {
        codes.iter().map(|c| c.parse().unwrap()).collect()
    }

    #[test]
    fn passes_the_queen_and_high_spades() {
        let hand = Hand::with_cards(cards(&[
            "Qs", "As", "Ks", "2c", "3c", "4c", "5d", "6d", "7d", "2h", "3h", "4h", "5h",
        ]));
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let pass = HeuristicPass.choose_pass(
            PlayerPosition::North,
            &hand,
            PassingDirection::Left,
            &mut rng,
        );
        let mut picked = pass.to_vec();
        picked.sort();
        let mut expected = cards(&["Qs", "As", "Ks"]);
        expected.sort();
        assert_eq!(picked, expected);
    }

    #[test]
    fn ducks_under_the_current_winner() {
        let state = GameState::from_parts(GameStateParts {
            round: 2,
            phase: Phase::Playing,
            pass_direction: PassingDirection::Right,
            hands: [
                Hand::with_cards(cards(&["Ad", "4d"])),
                Hand::with_cards(cards(&["2c", "3c"])),
                Hand::with_cards(cards(&["5c", "6c"])),
                Hand::with_cards(cards(&["9d"])),
            ],
            current_trick: Trick::new().with_play(PlayerPosition::West, "10d".parse().unwrap()),
            whose_turn: PlayerPosition::North,
            scores: [0; 4],
            round_scores: [0, 0, 0, 26],
            hearts_broken: true,
            game_over: false,
            winner: None,
        })
        .unwrap();
        let legal = state.legal_plays_for(PlayerPosition::North);
        let tracker = UnseenTracker::new();
        let ctx = PlayContext {
            state: &state,
            seat: PlayerPosition::North,
            legal: &legal,
            tracker: &tracker,
        };
        let card = HeuristicPlay.choose_play(&ctx, &mut ChaCha8Rng::seed_from_u64(0));
        assert_eq!(card, "4d".parse::<Card>().unwrap());
    }
}
