use super::{PassStrategy, PlayContext, PlayStrategy, format_cards};
use hearts_core::model::card::Card;
use hearts_core::model::hand::Hand;
use hearts_core::model::passing::PassingDirection;
use hearts_core::model::player::PlayerPosition;
use rand::RngCore;
use rand::seq::SliceRandom;
use tracing::{Level, event};

/// Uniformly random pass.
pub struct RandomPass;

/// Uniformly random legal play.
pub struct RandomPlay;

impl PassStrategy for RandomPass {
    fn choose_pass(
        &mut self,
        seat: PlayerPosition,
        hand: &Hand,
        direction: PassingDirection,
        rng: &mut dyn RngCore,
    ) -> [Card; 3] {
        let picked: Vec<Card> = hand.cards().choose_multiple(rng, 3).copied().collect();
        assert!(picked.len() == 3, "hand too small to pass: {} cards", hand.len());
        let selection = [picked[0], picked[1], picked[2]];
        event!(
            target: "hearts_bot::pass",
            Level::DEBUG,
            seat = ?seat,
            difficulty = "easy",
            direction = direction.as_str(),
            cards = %format_cards(&selection),
        );
        selection
    }
}

impl PlayStrategy for RandomPlay {
    fn choose_play(&mut self, ctx: &PlayContext<'_>, rng: &mut dyn RngCore) -> Card {
        let card = *ctx.legal.choose(rng).expect("no legal plays offered");
        event!(
            target: "hearts_bot::play",
            Level::DEBUG,
            seat = ?ctx.seat,
            difficulty = "easy",
            legal_count = ctx.legal.len(),
            chosen = %card,
        );
        card
    }
}
