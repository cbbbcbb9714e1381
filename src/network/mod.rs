//! Network Layer
//!
//! HTTP/JSON boundary for the commit-reveal protocol. This layer is
//! **non-deterministic** - all game semantics run through `game/` and
//! `protocol/`.

pub mod server;
pub mod wire;

pub use server::{routes, spawn_rotation_task, spawn_sweeper_task, AppState};
pub use wire::{
    CommitmentResponse, ErrorResponse, FinishGameRequest, FinishMismatchResponse,
    FinishVerifiedResponse, HealthResponse, StartGameRequest, StartGameResponse, StatusResponse,
    VerificationBody, VersionResponse,
};
