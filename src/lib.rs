//! # PADDLA Game Core
//!
//! Provably-fair interactive game core: a deterministic tick-based
//! physics engine, an input-seeded cryptographic RNG and the
//! commit-reveal protocol that lets a server verify a client-played game
//! tick-for-tick, and lets the client audit the server right back.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      PADDLA SERVER                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Deterministic primitives                │
//! │  ├── crypto.rs    - SHA-256, HMAC-SHA256, byte→double fold  │
//! │  ├── geom.rs      - Fixed-precision rounding, dist, clamp   │
//! │  └── rng.rs       - Input-seeded keyed-hash RNG             │
//! │                                                             │
//! │  game/            - Simulation (deterministic)              │
//! │  ├── config.rs    - Physics constants                       │
//! │  ├── state.rs     - Balls, bumper, game state               │
//! │  ├── collision.rs - Bumper / center / ball-ball resolution  │
//! │  ├── tick.rs      - The 16-phase authoritative tick         │
//! │  └── events.rs    - Observable per-tick events              │
//! │                                                             │
//! │  protocol/        - Commit-reveal shell                     │
//! │  ├── commitment.rs- Seed commitment, rotation, grace        │
//! │  ├── registry.rs  - Game lifecycle, settle by replay        │
//! │  ├── replay.rs    - Bounded deterministic replay            │
//! │  └── verify.rs    - Standalone audit primitive              │
//! │                                                             │
//! │  network/         - HTTP boundary (non-deterministic)       │
//! │  ├── wire.rs      - JSON bodies, bit-significant names      │
//! │  └── server.rs    - Routes, handlers, background loops      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fairness Guarantee
//!
//! The server commits to `SHA256(serverSeed)` before play. Every in-game
//! random draw is `HMAC(gameSeedHex, tick:bumperX:bumperY:label:counter)`
//! where the bumper coordinates are the player's own committed input, so
//! publishing `gameSeedHex` up front leaks nothing about draws the player
//! has not yet committed to. After settling, the server reveals
//! `serverSeed` and the player replays the whole game offline.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod network;
pub mod protocol;

// Re-export commonly used types
pub use crate::core::rng::GameRng;
pub use crate::game::events::{GameEvent, GoalSide};
pub use crate::game::state::{Ball, BallKind, Bumper, GameState, InputRecord, Target};
pub use crate::game::tick::{create_initial_state, play, tick};
pub use crate::protocol::verify::{verify, AuditOutcome, GameAudit};
pub use crate::protocol::{CommitmentSlot, GameRegistry, ProtocolError};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Protocol tag, bumped on any change to constants, labels or framing.
pub const PROTOCOL: &str = "paddla/1";
