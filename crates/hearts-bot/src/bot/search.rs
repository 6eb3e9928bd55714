use super::SearchError;
use super::determinize::determinize;
use super::rollout::rollout_cost;
use super::tracker::UnseenTracker;
use hearts_core::game::state::GameState;
use hearts_core::game::transitions::apply_play;
use hearts_core::model::card::Card;
use hearts_core::model::player::PlayerPosition;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

pub const DEFAULT_WORLDS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Determinized worlds sampled per decision.
    pub worlds: usize,
    /// Spread rollouts over the rayon pool.
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            worlds: DEFAULT_WORLDS,
            parallel: true,
        }
    }
}

impl SearchConfig {
    pub fn with_worlds(worlds: usize) -> Self {
        Self {
            worlds,
            ..Self::default()
        }
    }

    /// Applies `HEARTS_HARD_WORLDS` and `HEARTS_HARD_SERIAL` on top of `self`.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from<F>(self, mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let worlds = read("HEARTS_HARD_WORLDS")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|worlds| *worlds > 0)
            .unwrap_or(self.worlds);
        let serial = read("HEARTS_HARD_SERIAL")
            .map(|raw| matches!(raw.trim(), "1" | "true" | "TRUE" | "on" | "ON"))
            .unwrap_or(false);
        Self {
            worlds,
            parallel: self.parallel && !serial,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub card: Card,
    /// Average moon-adjusted round cost of the chosen card. `None` when the
    /// move was forced and nothing was simulated.
    pub expected_cost: Option<f64>,
    /// Average cost per candidate, in legal-move order.
    pub candidates: Vec<(Card, f64)>,
    pub worlds: usize,
}

/// Picks the legal card with the lowest average cost over sampled worlds.
///
/// World seeds are drawn from `rng` up front and every candidate is scored
/// against the same worlds, so the result depends only on the rng state and
/// the world count, never on thread scheduling.
pub fn search_play(
    state: &GameState,
    seat: PlayerPosition,
    legal: &[Card],
    tracker: &UnseenTracker,
    config: SearchConfig,
    rng: &mut dyn RngCore,
) -> Result<SearchOutcome, SearchError> {
    match legal {
        [] => return Err(SearchError::NoLegalPlays),
        [only] => {
            return Ok(SearchOutcome {
                card: *only,
                expected_cost: None,
                candidates: Vec::new(),
                worlds: 0,
            });
        }
        _ => {}
    }

    let worlds = config.worlds.max(1);
    let seeds: Vec<u64> = (0..worlds).map(|_| rng.next_u64()).collect();

    let sample = |seed: &u64| {
        let mut world_rng = ChaCha8Rng::seed_from_u64(*seed);
        determinize(state, seat, tracker, &mut world_rng)
    };
    let sampled: Vec<GameState> = if config.parallel {
        seeds.par_iter().map(sample).collect::<Result<_, _>>()?
    } else {
        seeds.iter().map(sample).collect::<Result<_, _>>()?
    };

    let work: Vec<(usize, usize)> = (0..legal.len())
        .flat_map(|candidate| (0..worlds).map(move |world| (candidate, world)))
        .collect();
    let evaluate = |&(candidate, world): &(usize, usize)| -> Result<u32, SearchError> {
        let after = apply_play(&sampled[world], seat, legal[candidate])?;
        rollout_cost(after, seat)
    };
    let costs: Vec<u32> = if config.parallel {
        work.par_iter().map(evaluate).collect::<Result<_, _>>()?
    } else {
        work.iter().map(evaluate).collect::<Result<_, _>>()?
    };

    let mut candidates = Vec::with_capacity(legal.len());
    let mut best: Option<(Card, f64)> = None;
    for (card, chunk) in legal.iter().zip(costs.chunks(worlds)) {
        let total: u64 = chunk.iter().map(|&cost| u64::from(cost)).sum();
        let average = total as f64 / worlds as f64;
        candidates.push((*card, average));
        if best.is_none_or(|(_, lowest)| average < lowest) {
            best = Some((*card, average));
        }
    }

    let (card, cost) = best.ok_or(SearchError::NoLegalPlays)?;
    Ok(SearchOutcome {
        card,
        expected_cost: Some(cost),
        candidates,
        worlds,
    })
}

#[cfg(test)]
mod tests {
    use super::{SearchConfig, search_play};
    use crate::bot::tracker::UnseenTracker;
    use hearts_core::game::state::{GameState, GameStateParts, Phase};
    use hearts_core::game::transitions::apply_play;
    use hearts_core::model::card::Card;
    use hearts_core::model::deck::Deck;
    use hearts_core::model::hand::Hand;
    use hearts_core::model::passing::PassingDirection;
    use hearts_core::model::player::PlayerPosition;
    use hearts_core::model::trick::Trick;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    fn cards(codes: &[&str]) -> Hand {
        Hand::with_cards(codes.iter().map(|c| c.parse().unwrap()).collect())
    }

    /// Second-to-last trick: West led the king of spades, North holds the
    /// ace and two of spades. Winning with the ace can only collect points.
    fn duck_position() -> GameState {
        GameState::from_parts(GameStateParts {
            round: 3,
            phase: Phase::Playing,
            pass_direction: PassingDirection::Across,
            hands: [
                cards(&["As", "2s"]),
                cards(&["Qh", "3d"]),
                cards(&["Qs", "9c"]),
                cards(&["5h"]),
            ],
            current_trick: Trick::new().with_play(PlayerPosition::West, "Ks".parse().unwrap()),
            whose_turn: PlayerPosition::North,
            scores: [10, 20, 30, 40],
            round_scores: [4, 3, 2, 6],
            hearts_broken: true,
            game_over: false,
            winner: None,
        })
        .unwrap()
    }

    /// The same table one play earlier, with West on lead holding the king.
    fn before_the_lead() -> GameState {
        let mut parts = duck_position().into_parts();
        parts.hands[PlayerPosition::West.index()] = cards(&["Ks", "5h"]);
        parts.current_trick = Trick::new();
        parts.whose_turn = PlayerPosition::West;
        GameState::from_parts(parts).unwrap()
    }

    /// Leads the king after every card outside the eight still held has been
    /// observed, so only the five opponent cards remain unseen for North.
    fn observed_duck_position() -> (GameState, UnseenTracker) {
        let before = before_the_lead();
        let mut tracker = UnseenTracker::new();
        for card in Deck::standard().cards() {
            let held = before.hands().iter().any(|hand| hand.contains(*card));
            if !held {
                tracker.observe_play(&before, PlayerPosition::West, *card);
            }
        }
        let king: Card = "Ks".parse().unwrap();
        tracker.observe_play(&before, PlayerPosition::West, king);
        let state = apply_play(&before, PlayerPosition::West, king).unwrap();
        (state, tracker)
    }

    #[test]
    fn ducks_across_seeds_with_an_observed_round() {
        let (state, tracker) = observed_duck_position();
        assert_eq!(state.whose_turn(), PlayerPosition::North);
        assert_eq!(tracker.unseen_count(&state, PlayerPosition::North), 5);

        let legal = state.legal_plays_for(PlayerPosition::North);
        let duck: Card = "2s".parse().unwrap();
        let ducks = (0..30u64)
            .filter(|seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(*seed);
                let outcome = search_play(
                    &state,
                    PlayerPosition::North,
                    &legal,
                    &tracker,
                    SearchConfig::with_worlds(50),
                    &mut rng,
                )
                .unwrap();
                outcome.card == duck
            })
            .count();
        assert!(ducks >= 27, "ducked in {ducks} of 30 seeds");
    }

    #[test]
    fn prefers_the_cheap_duck() {
        let state = duck_position();
        let tracker = UnseenTracker::new();
        let legal = state.legal_plays_for(PlayerPosition::North);
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let outcome = search_play(
            &state,
            PlayerPosition::North,
            &legal,
            &tracker,
            SearchConfig::with_worlds(200),
            &mut rng,
        )
        .unwrap();

        assert_eq!(outcome.card, "2s".parse::<Card>().unwrap());
        let costs: HashMap<Card, f64> = outcome.candidates.iter().copied().collect();
        assert!(costs[&"2s".parse().unwrap()] < costs[&"As".parse().unwrap()]);
        assert_eq!(outcome.worlds, 200);
    }

    #[test]
    fn forced_move_skips_simulation() {
        let state = duck_position();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let only = ["2s".parse::<Card>().unwrap()];
        let outcome = search_play(
            &state,
            PlayerPosition::North,
            &only,
            &UnseenTracker::new(),
            SearchConfig::default(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(outcome.card, only[0]);
        assert_eq!(outcome.expected_cost, None);
    }

    #[test]
    fn parallel_and_serial_agree_for_a_seed() {
        let state = duck_position();
        let legal = state.legal_plays_for(PlayerPosition::North);
        let tracker = UnseenTracker::new();
        let run = |parallel: bool| {
            let mut rng = ChaCha8Rng::seed_from_u64(99);
            let config = SearchConfig {
                worlds: 40,
                parallel,
            };
            search_play(&state, PlayerPosition::North, &legal, &tracker, config, &mut rng)
                .unwrap()
        };
        assert_eq!(run(true), run(false));
    }

    #[test]
    fn env_overrides_apply() {
        let env = |key: &str| match key {
            "HEARTS_HARD_WORLDS" => Some("12".to_string()),
            "HEARTS_HARD_SERIAL" => Some("1".to_string()),
            _ => None,
        };
        let config = SearchConfig::with_worlds(150).with_overrides_from(env);
        assert_eq!(config.worlds, 12);
        assert!(!config.parallel);

        let untouched = SearchConfig::with_worlds(150).with_overrides_from(|_| None);
        assert_eq!(untouched, SearchConfig::with_worlds(150));

        let bogus = SearchConfig::default()
            .with_overrides_from(|key| (key == "HEARTS_HARD_WORLDS").then(|| "0".to_string()));
        assert_eq!(bogus.worlds, 50);
    }
}
