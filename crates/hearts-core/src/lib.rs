#![deny(warnings)]
//! Rules, state and pure transitions for four-player Hearts.

pub mod error;
pub mod game;
pub mod model;
pub mod rules;

pub use error::GameError;
