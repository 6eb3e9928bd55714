pub mod serialization;
pub mod state;
pub mod transitions;

pub use state::{GameState, GameStateParts, Phase};
