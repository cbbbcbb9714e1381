//! Crypto Primitives
//!
//! SHA-256, HMAC-SHA256, hex codec and the byte-to-double fold used by the
//! input-seeded RNG. These operations are the interop surface of the
//! protocol: client and server implementations must agree bit-for-bit.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Hash output type (256 bits / 32 bytes).
pub type Digest32 = [u8; 32];

/// 2^64 as a double, the divisor for the byte fold.
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

/// Compute SHA-256 over raw bytes.
pub fn sha256(data: &[u8]) -> Digest32 {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute SHA-256 over a string's bytes and return lowercase hex.
///
/// Used for the seed commitment: `commitment = SHA256(serverSeed_ascii)`.
pub fn sha256_hex(data: &str) -> String {
    hex::encode(sha256(data.as_bytes()))
}

/// Compute HMAC-SHA256 of `msg` under `key`.
pub fn hmac_sha256(key: &[u8], msg: &[u8]) -> Digest32 {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(msg);
    mac.finalize().into_bytes().into()
}

/// Compute HMAC-SHA256 and return lowercase hex.
pub fn hmac_sha256_hex(key: &[u8], msg: &[u8]) -> String {
    hex::encode(hmac_sha256(key, msg))
}

/// Encode bytes as lowercase hex.
#[inline]
pub fn hex_encode(data: &[u8]) -> String {
    hex::encode(data)
}

/// Decode a hex string into bytes.
#[inline]
pub fn hex_decode(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(s)
}

/// Fold the first 8 bytes of a digest into a double in `[0, 1)`.
///
/// The fold is big-endian: the first four bytes form the high 32-bit word,
/// the next four the low word, combined as `high * 2^32 + low` and divided
/// by 2^64. Every implementation of the protocol performs this exact
/// computation, so the resulting doubles match bit-for-bit.
pub fn bytes_to_double(bytes: &Digest32) -> f64 {
    let high = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as u64;
    let low = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as u64;
    let folded = (high << 32) | low;
    folded as f64 / TWO_POW_64
}

// =============================================================================
// TESTS
// =============================================================================
