//! Game Logic Module
//!
//! The deterministic simulation. Everything here is a pure function of
//! `(gameSeedHex, numBalls, input sequence)` — no clocks, no ambient
//! randomness, no platform-dependent state.
//!
//! ## Module Structure
//!
//! - `config`: physics constants (the protocol's shared numbers)
//! - `state`: balls, bumper, game state, input records
//! - `events`: observable per-tick events
//! - `collision`: bumper / center / ball-ball resolution
//! - `tick`: the authoritative simulation loop

pub mod collision;
pub mod config;
pub mod events;
pub mod state;
pub mod tick;

// Re-export key types
pub use events::{GameEvent, GoalSide};
pub use state::{Ball, BallKind, Bumper, GameState, InputRecord, Target};
pub use tick::{create_initial_state, play, tick, PlayedGame};
