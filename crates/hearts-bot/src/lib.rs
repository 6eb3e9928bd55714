//! Computer opponents: card tracking, heuristic planners and the
//! determinized Monte Carlo search behind the hard tiers.

pub mod bot;
pub mod policy;

pub use bot::{PassPlanner, PlayPlanner, SearchConfig, SearchError, SearchOutcome, UnseenTracker};
pub use policy::{
    Difficulty, PassStrategy, PlayContext, PlayStrategy, Strategies, UnknownDifficulty,
    create_strategies,
};
