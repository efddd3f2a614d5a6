//! SHA-256 digests and constant-time comparison of hex digests.
//!
//! Used for the password fingerprint and for the checksum over a
//! serialized vault.  Digests are always lowercase hex, 64 characters.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// SHA-256 of `data`, hex encoded.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Compare two hex digests without leaking where they differ.
///
/// Returns `false` when either side is not valid hex or the decoded
/// lengths differ.  Case of the hex digits does not matter.
pub fn digest_eq(expected_hex: &str, actual_hex: &str) -> bool {
    let (Ok(expected), Ok(actual)) = (hex::decode(expected_hex), hex::decode(actual_hex)) else {
        return false;
    };
    expected.ct_eq(&actual).into()
}

/// True if `s` is exactly `len` lowercase hex characters.
pub fn is_lower_hex(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
