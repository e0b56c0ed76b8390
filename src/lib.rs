//! Grid Snake - a single-player snake game for the terminal
//!
//! This library provides:
//! - Core game logic and the session state machine (game module)
//! - Keyboard mapping (input module)
//! - Display-list drawing and the ratatui front end (render module)
//! - The interactive play loop (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
