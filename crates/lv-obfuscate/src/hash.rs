//! Deterministic hash primitives.
//!
//! Substitute values are picked by hashing the original value, so output
//! depends only on the input, the position and the configuration. None of
//! these functions carry state.

use sha2::{Digest, Sha256};

/// Full length of a SHA-256 digest in hex characters.
pub const DIGEST_HEX_LEN: usize = 64;

/// FNV-1a, 32-bit.
fn fnv1a32(bytes: &[u8]) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in bytes {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

/// Stable index in `0..bound` derived from `value`.
///
/// A `bound` of zero yields 0.
pub fn hash_index(value: &str, bound: usize) -> usize {
    if bound == 0 {
        return 0;
    }
    fnv1a32(value.as_bytes()) as usize % bound
}

/// Stable octet for `value` at `position`.
///
/// The same base value gives different octets at different positions.
pub fn hash_octet(value: &str, position: usize) -> u8 {
    let key = format!("{}:{}", value, position);
    (fnv1a32(key.as_bytes()) % 256) as u8
}

/// SHA-256 digest of `value`.
pub fn digest(value: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(value.as_bytes()));
    out
}

/// Lowercase hex SHA-256 of `value`, truncated to `length` characters.
///
/// Returns the full digest when `length` is 0 or longer than the digest.
pub fn hash_hex(value: &str, length: usize) -> String {
    let full = hex::encode(digest(value));
    if length > 0 && length < full.len() {
        full[..length].to_string()
    } else {
        full
    }
}
