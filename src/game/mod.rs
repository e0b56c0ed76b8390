//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The terminal front end drives it through [`Session`].

pub mod action;
pub mod config;
pub mod engine;
pub mod queue;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::GameConfig;
pub use engine::{GameEngine, StepResult};
pub use queue::DirectionQueue;
pub use session::{EndReason, Phase, Session};
pub use state::{CollisionType, GameState, Position, Snake};
