use super::heuristic::{log_pass_decision, log_play_decision};
use super::{Difficulty, PassStrategy, PlayContext, PlayStrategy};
use crate::bot::{PassPlanner, PlayPlanner, SearchConfig, search_play};
use hearts_core::model::card::Card;
use hearts_core::model::hand::Hand;
use hearts_core::model::passing::PassingDirection;
use hearts_core::model::player::PlayerPosition;
use rand::RngCore;
use tracing::{Level, event};

/// Exhaustive pass: keeps the thirteen-choose-ten hand with the lowest danger.
pub struct HardPass;

/// Monte Carlo play over determinized worlds.
pub struct HardPlay {
    difficulty: Difficulty,
    config: SearchConfig,
}

impl HardPlay {
    pub fn new(difficulty: Difficulty, config: SearchConfig) -> Self {
        Self { difficulty, config }
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }
}

impl PassStrategy for HardPass {
    fn choose_pass(
        &mut self,
        seat: PlayerPosition,
        hand: &Hand,
        direction: PassingDirection,
        _rng: &mut dyn RngCore,
    ) -> [Card; 3] {
        let selection =
            PassPlanner::safest_remaining(hand).expect("PassPlanner returns valid pass");
        log_pass_decision(seat, "hard", direction, &selection);
        selection
    }
}

impl PlayStrategy for HardPlay {
    fn choose_play(&mut self, ctx: &PlayContext<'_>, rng: &mut dyn RngCore) -> Card {
        assert!(!ctx.legal.is_empty(), "no legal plays offered to {}", self.difficulty);

        let mut tracker = ctx.tracker.clone();
        tracker.observe_state(ctx.state);

        match search_play(ctx.state, ctx.seat, ctx.legal, &tracker, self.config, rng) {
            Ok(outcome) => {
                log_play_decision(ctx, self.difficulty.label(), outcome.card, outcome.expected_cost);
                outcome.card
            }
            Err(err) => {
                event!(
                    target: "hearts_bot::play",
                    Level::WARN,
                    seat = ?ctx.seat,
                    difficulty = self.difficulty.label(),
                    error = %err,
                    "search failed; falling back to the heuristic"
                );
                PlayPlanner::choose(ctx.state, ctx.seat, ctx.legal)
                    .unwrap_or(ctx.legal[0])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{HardPass, HardPlay};
    use crate::bot::{SearchConfig, UnseenTracker};
    use crate::policy::{Difficulty, PassStrategy, PlayContext, PlayStrategy};
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
    fn hard_pass_sheds_the_queen() {
        let hand = Hand::with_cards(cards(&[
            "2c", "5c", "9c", "3d", "8d", "Jd", "Qs", "Ks", "As", "4h", "7h", "10h", "Kh",
        ]));
        let pass = HardPass.choose_pass(
            PlayerPosition::East,
            &hand,
            PassingDirection::Across,
            &mut ChaCha8Rng::seed_from_u64(0),
        );
        assert!(pass.contains(&Card::QUEEN_OF_SPADES));
    }

    #[test]
    fn same_seed_same_choice() {
        let state = GameState::from_parts(GameStateParts {
            round: 5,
            phase: Phase::Playing,
            pass_direction: PassingDirection::Left,
            hands: [
                Hand::with_cards(cards(&["As", "2s", "7d"])),
                Hand::with_cards(cards(&["Qh", "3d", "4c"])),
                Hand::with_cards(cards(&["Qs", "9c", "8h"])),
                Hand::with_cards(cards(&["5h", "6c"])),
            ],
            current_trick: Trick::new().with_play(PlayerPosition::West, "Ks".parse().unwrap()),
            whose_turn: PlayerPosition::North,
            scores: [0; 4],
            round_scores: [5, 0, 0, 0],
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
        let config = SearchConfig {
            worlds: 16,
            parallel: true,
        };
        let pick = |seed| {
            HardPlay::new(Difficulty::Hard, config)
                .choose_play(&ctx, &mut ChaCha8Rng::seed_from_u64(seed))
        };
        let first = pick(4);
        assert_eq!(first, pick(4));
        assert!(legal.contains(&first));
    }
}
