//! Input-Seeded Random Number Generator
//!
//! A keyed-hash RNG whose every draw depends on the player's committed
//! bumper position for the current tick. Because the position is mixed
//! into the HMAC message *before* any outcome is computed, revealing the
//! game seed to the player does not leak future randomness: to learn a
//! draw the player must first commit to the exact bumper position that
//! produced it.
//!
//! ## Message framing
//!
//! Each draw hashes the string
//!
//! ```text
//! {tick}:{bumperX:.4}:{bumperY:.4}:{label}:{counter}
//! ```
//!
//! under the game seed (the 64-hex-char string, used as raw ASCII key
//! bytes). Coordinates are formatted with exactly four fractional digits,
//! trailing zeros preserved. The framing is the most fragile interop
//! point of the whole protocol; change nothing here without versioning.

use crate::core::crypto::{bytes_to_double, hmac_sha256};

/// Deterministic RNG bound to one game seed.
///
/// Holds a mutable tick context `(tick, bumperX, bumperY)` plus a
/// per-context draw counter. Rebinding the context to a different triple
/// resets the counter; rebinding to the same triple is a no-op.
///
/// # Example
///
/// ```
/// use paddla::core::rng::GameRng;
///
/// let mut rng = GameRng::new(
///     "0000000000000000000000000000000000000000000000000000000000000000",
/// );
/// rng.set_tick_context(1, 4.5, 2.0);
/// let a = rng.next_double("spawn_x");
/// let b = rng.next_double("spawn_x");
/// assert_ne!(a, b); // counter advanced
/// ```
#[derive(Clone, Debug)]
pub struct GameRng {
    /// HMAC key: the game seed hex string as ASCII bytes.
    key: Vec<u8>,
    tick: u32,
    bumper_x: f64,
    bumper_y: f64,
    counter: u32,
}

impl GameRng {
    /// Create an RNG keyed to a game seed.
    pub fn new(game_seed_hex: &str) -> Self {
        Self {
            key: game_seed_hex.as_bytes().to_vec(),
            tick: 0,
            bumper_x: 0.0,
            bumper_y: 0.0,
            counter: 0,
        }
    }

    /// Bind the draw context for a tick.
    ///
    /// If the `(tick, bumper_x, bumper_y)` triple is unchanged the context
    /// (including the counter) is left alone; otherwise the triple is
    /// replaced and the counter resets to zero.
    pub fn set_tick_context(&mut self, tick: u32, bumper_x: f64, bumper_y: f64) {
        if self.tick == tick && self.bumper_x == bumper_x && self.bumper_y == bumper_y {
            return;
        }
        self.tick = tick;
        self.bumper_x = bumper_x;
        self.bumper_y = bumper_y;
        self.counter = 0;
    }

    /// Draw the next double in `[0, 1)` for an event label.
    ///
    /// Advances the per-context counter so repeated draws under the same
    /// label differ.
    pub fn next_double(&mut self, label: &str) -> f64 {
        let message = format!(
            "{}:{:.4}:{:.4}:{}:{}",
            self.tick, self.bumper_x, self.bumper_y, label, self.counter
        );
        self.counter += 1;
        let digest = hmac_sha256(&self.key, message.as_bytes());
        bytes_to_double(&digest)
    }

    /// Current draw counter (for diagnostics).
    pub fn counter(&self) -> u32 {
        self.counter
    }
}

// =============================================================================
// TESTS
// =============================================================================
