use super::SearchError;
use super::play::PlayPlanner;
use hearts_core::game::state::GameState;
use hearts_core::game::transitions::apply_play;
use hearts_core::model::player::PlayerPosition;
use hearts_core::model::score::moon_adjusted_cost;

/// Finishes the round with every seat playing the heuristic planner and
/// returns the raw round points.
pub fn simulate_round(mut state: GameState) -> Result<[u32; 4], SearchError> {
    while !state.is_round_complete() {
        let seat = state.whose_turn();
        let legal = state.legal_plays_for(seat);
        let card = PlayPlanner::choose(&state, seat, &legal).ok_or(SearchError::NoLegalPlays)?;
        state = apply_play(&state, seat, card)?;
    }
    Ok(*state.round_scores())
}

/// Round cost for `seat` once `world` is played out, after the moon adjustment.
pub fn rollout_cost(world: GameState, seat: PlayerPosition) -> Result<u32, SearchError> {
    let scores = simulate_round(world)?;
    Ok(moon_adjusted_cost(&scores, seat))
}
