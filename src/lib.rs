//! Classic grid snake for the terminal
//!
//! This library provides:
//! - Core simulation logic (game module): tick movement, collisions, food
//! - Session lifecycle and high-score persistence (session module)
//! - Keyboard input mapping (input module)
//! - TUI rendering (render module)
//! - The async play mode wiring it all to a tick timer (modes module)

pub mod game;
pub mod input;
pub mod modes;
pub mod render;
pub mod session;
