//! Fixed-length padding for record plaintexts.
//!
//! Every value is padded to `PADDED_LEN` bytes before encryption so
//! ciphertext length says nothing about the credential length:
//!
//! ```text
//! [ value bytes | 0x80 | 0x00 ... 0x00 ]   (always 65 bytes)
//! ```
//!
//! Unpadding scans backwards over the zero fill to the `0x80` marker,
//! so values containing `0x00` or `0x80` bytes round-trip exactly.

use zeroize::Zeroizing;

use crate::errors::{VaultError, Result};

/// Maximum credential length in bytes (UTF-8 encoded).
pub const MAX_VALUE_LEN: usize = 64;

/// Length of every padded plaintext.
pub const PADDED_LEN: usize = MAX_VALUE_LEN + 1;

const MARKER: u8 = 0x80;

/// Pad `value` to `PADDED_LEN` bytes.  Longer values are rejected, never truncated.
pub fn pad(value: &str) -> Result<Zeroizing<Vec<u8>>> {
    let bytes = value.as_bytes();
    if bytes.len() > MAX_VALUE_LEN {
        return Err(VaultError::ValueTooLong {
            len: bytes.len(),
            max: MAX_VALUE_LEN,
        });
    }

    let mut padded = Zeroizing::new(Vec::with_capacity(PADDED_LEN));
    padded.extend_from_slice(bytes);
    padded.push(MARKER);
    padded.resize(PADDED_LEN, 0x00);
    Ok(padded)
}

/// Recover the original string from a padded buffer.
///
/// A buffer of the wrong size, without a marker, or holding invalid
/// UTF-8 can only come from tampering and is reported as `RecordTampered`.
pub fn unpad(padded: &[u8]) -> Result<String> {
    if padded.len() != PADDED_LEN {
        return Err(VaultError::RecordTampered);
    }

    let marker_at = padded
        .iter()
        .rposition(|&b| b != 0x00)
        .filter(|&i| padded[i] == MARKER)
        .ok_or(VaultError::RecordTampered)?;

    String::from_utf8(padded[..marker_at].to_vec()).map_err(|_| VaultError::RecordTampered)
}
