//! Core simulation logic for Snake
//!
//! This module contains all the game logic without any I/O, timer, or
//! rendering dependencies: the whole simulation is a [`GameState`] value that
//! a [`GameEngine`] advances one tick at a time.

pub mod config;
pub mod direction;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{GameEngine, TickOutcome};
pub use state::{GameOverReason, GameState, Position, Snake};
