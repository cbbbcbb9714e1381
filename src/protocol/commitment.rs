//! Commitment Lifecycle
//!
//! The server commits to a secret seed by publishing its SHA-256 before
//! any game opens. Rotation moves the live pair into a single-slot
//! history so games opened against the previous commitment can still
//! settle; anything older is expired and rejects new games.
//!
//! State transitions: `FRESH -> ROTATED (finish-only grace) -> EXPIRED`.

use std::time::Duration;

use rand::rngs::OsRng;
use rand::RngCore;

use crate::core::crypto::{hex_encode, sha256_hex};
use crate::protocol::{now_ms, ProtocolError};

/// Default rotation interval (one hour).
pub const DEFAULT_ROTATION_INTERVAL: Duration = Duration::from_secs(3600);

/// A server seed with its published commitment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitmentPair {
    /// Secret seed: 32 cryptographically random bytes, hex-encoded.
    /// Revealed to the player only after their game verifies.
    pub server_seed: String,
    /// Published hash: `SHA256(serverSeed_ascii)`, hex-encoded.
    pub commitment: String,
    /// When this pair became current (ms since epoch).
    pub created_at_ms: u64,
}

impl CommitmentPair {
    fn generate() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        let server_seed = hex_encode(&bytes);
        let commitment = sha256_hex(&server_seed);
        Self {
            server_seed,
            commitment,
            created_at_ms: now_ms(),
        }
    }
}

/// Public view of the current commitment.
#[derive(Clone, Debug)]
pub struct CommitmentInfo {
    /// The published commitment hash.
    pub commitment: String,
    /// When it was published (ms since epoch).
    pub timestamp: u64,
    /// Milliseconds until the next scheduled rotation.
    pub expires_in: u64,
}

/// Process-wide commitment state: the live pair plus one retained
/// predecessor.
///
/// Access must be serialised by the caller (the server wraps it in an
/// `RwLock`); every operation here is O(1) read-or-swap.
#[derive(Debug)]
pub struct CommitmentSlot {
    current: CommitmentPair,
    previous: Option<CommitmentPair>,
    rotation_interval: Duration,
}

impl CommitmentSlot {
    /// Create a slot with a freshly generated seed.
    pub fn new(rotation_interval: Duration) -> Self {
        Self {
            current: CommitmentPair::generate(),
            previous: None,
            rotation_interval,
        }
    }

    /// Retire the current pair into the history slot and generate a new one.
    pub fn rotate(&mut self) {
        let retired = std::mem::replace(&mut self.current, CommitmentPair::generate());
        self.previous = Some(retired);
    }

    /// Public commitment info for `GET /commitment`.
    pub fn info(&self) -> CommitmentInfo {
        let age = now_ms().saturating_sub(self.current.created_at_ms);
        let interval_ms = self.rotation_interval.as_millis() as u64;
        CommitmentInfo {
            commitment: self.current.commitment.clone(),
            timestamp: self.current.created_at_ms,
            expires_in: interval_ms.saturating_sub(age),
        }
    }

    /// Resolve which pair a new game binds to.
    ///
    /// With no recorded commitment the current pair is used. A recorded
    /// commitment must match the current or the retained previous pair;
    /// anything else is expired or bogus and rejects the game.
    pub fn pair_for(&self, recorded: Option<&str>) -> Result<&CommitmentPair, ProtocolError> {
        match recorded {
            None => Ok(&self.current),
            Some(c) if c == self.current.commitment => Ok(&self.current),
            Some(c) => match &self.previous {
                Some(prev) if c == prev.commitment => Ok(prev),
                _ => Err(ProtocolError::InvalidCommitment),
            },
        }
    }

    /// The live pair.
    pub fn current(&self) -> &CommitmentPair {
        &self.current
    }

    /// Configured rotation interval.
    pub fn rotation_interval(&self) -> Duration {
        self.rotation_interval
    }
}

// =============================================================================
// TESTS
// =============================================================================
