//! Commit-Reveal Protocol
//!
//! The non-deterministic shell around the engine: commitment lifecycle,
//! game registry, bounded replay and the standalone audit primitive.
//!
//! ## Protocol flow
//!
//! ```text
//! client                              server
//!   |  GET /commitment                  |   commitment = SHA256(serverSeed)
//!   |<----------------------------------|
//!   |  POST /game/start                 |   gameSeedHex =
//!   |   {clientSeed, numBalls}          |     HMAC(serverSeed, clientSeed:gameId)
//!   |<----------------------------------|
//!   |  ... plays locally, logging every bumper target ...
//!   |  POST /game/{id}/finish           |   replay(gameSeedHex, inputLog)
//!   |   {inputLog, clientTotalWin}      |   compare totals
//!   |<----------------------------------|   on match: reveal serverSeed
//!   |  verify(serverSeed, ...) offline  |
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use crate::core::crypto::hmac_sha256_hex;

pub mod commitment;
pub mod registry;
pub mod replay;
pub mod verify;

// Re-export key types
pub use commitment::{CommitmentInfo, CommitmentPair, CommitmentSlot};
pub use registry::{FinishReport, GameRegistry, GameStatus, StartedGame, Verification};
pub use replay::{replay, validate_input_log, ReplayOutcome};
pub use verify::{verify, AuditFailure, AuditOutcome, GameAudit};

/// Boundary errors of the protocol layer.
///
/// Audit failures (`verified: false` outcomes) are business results, not
/// errors, and never appear here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// Client seed was empty.
    #[error("Invalid parameters: clientSeed must be a non-empty string")]
    EmptyClientSeed,

    /// Ball count was outside the accepted range.
    #[error("Invalid parameters: numBalls must be between 1 and 1000")]
    InvalidNumBalls,

    /// Recorded commitment matches neither the current nor the retained
    /// previous commitment.
    #[error("Invalid commitment: not the current or previous commitment")]
    InvalidCommitment,

    /// Input log failed well-formedness checks.
    #[error("Invalid input log: {0}")]
    MalformedInputLog(String),

    /// Unknown game id, or the entry was already swept.
    #[error("Game not found")]
    GameNotFound,

    /// Worker failure while replaying.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Derive the game seed: `HMAC_SHA256(serverSeed, clientSeed ":" gameId)`,
/// hex-encoded. The server seed is keyed as its ASCII hex string.
pub fn derive_game_seed(server_seed: &str, client_seed: &str, game_id: &str) -> String {
    let message = format!("{}:{}", client_seed, game_id);
    hmac_sha256_hex(server_seed.as_bytes(), message.as_bytes())
}

/// Milliseconds since the Unix epoch.
pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_game_seed_shape() {
        let seed = derive_game_seed("aa".repeat(32).as_str(), "lucky", "0123456789abcdef");
        assert_eq!(seed.len(), 64);
        assert!(seed.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_derive_game_seed_inputs_matter() {
        let base = derive_game_seed("s1", "c1", "g1");
        assert_ne!(base, derive_game_seed("s2", "c1", "g1"));
        assert_ne!(base, derive_game_seed("s1", "c2", "g1"));
        assert_ne!(base, derive_game_seed("s1", "c1", "g2"));
    }

    #[test]
    fn test_derive_game_seed_separator() {
        // "ab" + "c" and "a" + "bc" must not collide
        assert_ne!(
            derive_game_seed("seed", "ab", "c"),
            derive_game_seed("seed", "a", "bc")
        );
    }

    #[test]
    fn test_error_messages_name_the_field() {
        assert!(ProtocolError::EmptyClientSeed.to_string().contains("clientSeed"));
        assert!(ProtocolError::InvalidNumBalls.to_string().contains("numBalls"));
        assert!(ProtocolError::InvalidCommitment
            .to_string()
            .starts_with("Invalid commitment"));
    }
}
