//! Core deterministic primitives.
//!
//! Everything in this module is designed for perfect cross-platform
//! determinism: the crypto operations, the fixed-precision geometry and
//! the input-seeded RNG must produce bit-identical results in every
//! implementation of the protocol.

pub mod crypto;
pub mod geom;
pub mod rng;

// Re-export core types
pub use crypto::{bytes_to_double, hmac_sha256, hmac_sha256_hex, sha256, sha256_hex};
pub use geom::{clamp, dist, fp_round};
pub use rng::GameRng;
