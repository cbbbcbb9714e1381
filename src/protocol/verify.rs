//! Audit Primitive
//!
//! The standalone check a player (or anyone) runs after the server
//! reveals its seed. Three links are verified in order; the first broken
//! one names the failure:
//!
//! 1. the revealed seed hashes to the published commitment,
//! 2. the game seed really derives from `(serverSeed, clientSeed, gameId)`,
//! 3. replaying the input log reproduces the claimed total.
//!
//! Runs identically on client or server; nothing here touches server
//! state.

use serde::{Deserialize, Serialize};

use crate::core::crypto::sha256_hex;
use crate::game::state::InputRecord;
use crate::protocol::replay::replay;
use crate::protocol::derive_game_seed;

/// Everything needed to audit one finished game.
///
/// Serializable so an audit record can be shipped to the player as a
/// single JSON document.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameAudit {
    /// The seed the server revealed.
    pub server_seed: String,
    /// The seed the player chose.
    pub client_seed: String,
    /// The game id the server assigned.
    pub game_id: String,
    /// The commitment published before play.
    pub expected_commitment: String,
    /// The game seed the server returned at start.
    pub expected_game_seed_hex: String,
    /// Ball count of the game.
    pub num_balls: u32,
    /// The recorded input log.
    pub input_log: Vec<InputRecord>,
    /// The total the game reportedly paid.
    pub claimed_total_win: u64,
}

/// Which link of the audit chain broke.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuditFailure {
    /// `SHA256(serverSeed)` does not equal the published commitment.
    #[error("commitment mismatch: the revealed seed does not hash to the published commitment")]
    CommitmentMismatch,

    /// The game seed does not derive from the revealed server seed.
    #[error("seed mismatch: gameSeedHex does not derive from (serverSeed, clientSeed, gameId)")]
    SeedMismatch,

    /// Replay disagrees with the claimed total.
    #[error("replay mismatch: claimed {claimed} but replay computed {computed}")]
    ReplayMismatch {
        /// The total being audited.
        claimed: u64,
        /// The total replay produced.
        computed: u64,
    },
}

/// Audit verdict.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditOutcome {
    /// True when all three links hold.
    pub valid: bool,
    /// The first broken link, if any.
    pub reason: Option<AuditFailure>,
}

impl AuditOutcome {
    fn ok() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    fn fail(reason: AuditFailure) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }
}

/// Audit a finished game.
pub fn verify(audit: &GameAudit) -> AuditOutcome {
    if sha256_hex(&audit.server_seed) != audit.expected_commitment {
        return AuditOutcome::fail(AuditFailure::CommitmentMismatch);
    }

    let derived = derive_game_seed(&audit.server_seed, &audit.client_seed, &audit.game_id);
    if derived != audit.expected_game_seed_hex {
        return AuditOutcome::fail(AuditFailure::SeedMismatch);
    }

    let outcome = replay(&audit.expected_game_seed_hex, audit.num_balls, &audit.input_log);
    if outcome.total_win != audit.claimed_total_win {
        return AuditOutcome::fail(AuditFailure::ReplayMismatch {
            claimed: audit.claimed_total_win,
            computed: outcome.total_win,
        });
    }

    AuditOutcome::ok()
}

// =============================================================================
// TESTS
// =============================================================================
