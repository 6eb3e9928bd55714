use crate::game::state::GameState;

/// Pretty JSON for a state, suitable for saving to disk.
pub fn to_json(state: &GameState) -> serde_json::Result<String> {
    serde_json::to_string_pretty(state)
}

/// Parses and validates a state. Invariant violations surface as a
/// `serde_json::Error` carrying the `CorruptState` message.
pub fn from_json(json: &str) -> serde_json::Result<GameState> {
    serde_json::from_str(json)
}
