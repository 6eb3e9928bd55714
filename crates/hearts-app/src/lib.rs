//! Game runner for one human against three computer seats, with a
//! front-end projection, event callbacks and resumable sessions.

pub mod command;
pub mod events;
pub mod projection;
pub mod runner;
pub mod session;

pub use events::{CompletedTrick, GameEvents, NoEvents, RecordedEvent, RecordedEvents};
pub use projection::{SeatView, TableView, TrickCardView};
pub use runner::{DEFAULT_SEAT_NAMES, GameRunner, HUMAN_SEAT, RunnerError};
pub use session::{SessionError, SessionSnapshot};
