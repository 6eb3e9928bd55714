mod determinize;
mod pass;
mod play;
mod rollout;
mod search;
mod tracker;

pub use determinize::determinize;
pub use pass::{PassPlanner, hand_danger, pass_danger};
pub use play::{PlayPlanner, queen_may_be_out};
pub use rollout::{rollout_cost, simulate_round};
pub use search::{DEFAULT_WORLDS, SearchConfig, SearchOutcome, search_play};
pub use tracker::UnseenTracker;

use hearts_core::error::GameError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("no legal plays to search")]
    NoLegalPlays,
    #[error("only {available} unseen cards for {needed} hidden slots")]
    InsufficientUnseen { needed: usize, available: usize },
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Like `max_by_key`, but the first of several equal maxima wins.
pub(crate) fn first_max_by_key<T, K, I, F>(iter: I, mut key: F) -> Option<T>
where
    I: Iterator<Item = T>,
    K: Ord,
    F: FnMut(&T) -> K,
{
    let mut best: Option<(T, K)> = None;
    for item in iter {
        let value = key(&item);
        if best.as_ref().is_none_or(|(_, top)| value > *top) {
            best = Some((item, value));
        }
    }
    best.map(|(item, _)| item)
}

#[cfg(test)]
mod tests {
    use super::first_max_by_key;

    #[test]
    fn first_max_keeps_earliest_tie() {
        let items = [(1, 'a'), (3, 'b'), (3, 'c'), (2, 'd')];
        let best = first_max_by_key(items.iter(), |item| item.0);
        assert_eq!(best, Some(&(3, 'b')));
        assert_eq!(first_max_by_key(std::iter::empty::<u8>(), |v| *v), None);
    }
}
