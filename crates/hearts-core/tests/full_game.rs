use hearts_core::game::state::{GameState, Phase};
use hearts_core::game::transitions::{
    apply_passes, apply_play, apply_round_scoring, deal_shuffled_round, new_game,
};
use hearts_core::model::card::Card;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

fn assert_conserved(state: &GameState) {
    let mut seen = HashSet::new();
    for hand in state.hands() {
        assert!(hand.len() <= 13);
        for card in hand.iter() {
            assert!(seen.insert(*card), "{card} held twice");
        }
    }
    for card in state.current_trick().cards() {
        assert!(seen.insert(card), "{card} on the table and in a hand");
    }
    assert!(state.current_trick().len() < 4);
    assert_eq!(seen.len(), 52 - 4 * state.tricks_completed());
}

fn random_passes(state: &GameState, rng: &mut StdRng) -> [[Card; 3]; 4] {
    std::array::from_fn(|i| {
        let picked: Vec<Card> = state.hands()[i]
            .cards()
            .choose_multiple(rng, 3)
            .copied()
            .collect();
        [picked[0], picked[1], picked[2]]
    })
}

/// Plays random legal cards until one round is complete.
fn play_round(mut state: GameState, rng: &mut StdRng) -> GameState {
    if state.phase() == Phase::Passing {
        let passes = random_passes(&state, rng);
        state = apply_passes(&state, &passes).expect("valid passes");
    }
    let leader = state.whose_turn();
    assert_eq!(
        state.legal_plays_for(leader),
        vec![Card::TWO_OF_CLUBS],
        "opening lead must be the two of clubs"
    );
    while !state.is_round_complete() {
        assert_conserved(&state);
        let seat = state.whose_turn();
        let legal = state.legal_plays_for(seat);
        let card = *legal.choose(rng).expect("a legal play exists");
        state = apply_play(&state, seat, card).expect("legal play applies");
    }
    let taken: u32 = state.round_scores().iter().sum();
    assert_eq!(taken, 26);
    state
}

#[test]
fn random_games_finish_with_consistent_totals() {
    for seed in 0..8u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state = new_game(&mut rng).unwrap();
        let mut rounds = 0;
        loop {
            rounds += 1;
            let before: u32 = state.scores().iter().sum();
            state = apply_round_scoring(&play_round(state, &mut rng));
            let after: u32 = state.scores().iter().sum();
            assert!(after - before == 26 || after - before == 78);
            if state.is_game_over() {
                break;
            }
            state = deal_shuffled_round(*state.scores(), state.round() + 1, &mut rng).unwrap();
            assert_eq!(state.round(), rounds + 1);
        }
        assert!(state.scores().iter().any(|&s| s >= 100));
        assert!(state.winner().is_some());
    }
}

#[test]
fn hearts_stay_unled_until_broken() {
    let mut rng = StdRng::seed_from_u64(77);
    let mut state = new_game(&mut rng).unwrap();
    let passes = random_passes(&state, &mut rng);
    state = apply_passes(&state, &passes).unwrap();
    while !state.is_round_complete() {
        let seat = state.whose_turn();
        let legal = state.legal_plays_for(seat);
        if state.current_trick().is_empty() && !state.hearts_broken() {
            let all_hearts = state.hand(seat).iter().all(|c| c.suit.is_heart());
            if !all_hearts {
                assert!(legal.iter().all(|c| !c.suit.is_heart()));
            }
        }
        let card = *legal.choose(&mut rng).unwrap();
        state = apply_play(&state, seat, card).unwrap();
    }
}

#[test]
fn failed_play_leaves_state_usable() {
    let mut rng = StdRng::seed_from_u64(12);
    let state = new_game(&mut rng).unwrap();
    let passes = random_passes(&state, &mut rng);
    let playing = apply_passes(&state, &passes).unwrap();
    let leader = playing.whose_turn();
    let wrong_seat = leader.next();
    assert!(apply_play(&playing, wrong_seat, Card::TWO_OF_CLUBS).is_err());
    let next = apply_play(&playing, leader, Card::TWO_OF_CLUBS).unwrap();
    assert_eq!(next.whose_turn(), leader.next());
}
