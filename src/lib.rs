//! Core of a single-player Space Invaders arcade game.
//!
//! The library owns the simulation: entity records, the formation
//! simulator that drives a level of play, the game-flow state machine and
//! the session context that dispatches ticks and input to the active
//! state.  Rendering is expressed against the abstract [`display::Surface`]
//! capability; the terminal frontend in `main.rs` supplies a crossterm
//! implementation and the fixed-rate frame scheduler.

pub mod config;
pub mod display;
pub mod entities;
pub mod game;
pub mod play;
pub mod state;
pub mod terminal;

pub use config::{GameConfig, GameError};
pub use game::{Game, Key, Session};
pub use state::{State, Transition};
