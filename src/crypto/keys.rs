//! Key separation for the vault.
//!
//! One Argon2id run yields 64 bytes of key material, split in a fixed
//! order:
//! - bytes `0..32`: the **lookup key**, used only for HMAC-SHA256 over
//!   domain names to produce record IDs.
//! - bytes `32..64`: the **record key**, used only for AES-256-GCM over
//!   padded record values.
//!
//! Neither key can be computed from the other without running the KDF
//! again.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroize;

use super::encryption;
use super::kdf::{derive_key_material, Argon2Params, KEY_MATERIAL_LEN};
use crate::errors::{VaultError, Result};

/// Length of each sub-key (256 bits).
pub const KEY_LEN: usize = 32;

/// Length of a hex-encoded record ID (HMAC-SHA256 output).
pub const RECORD_ID_HEX_LEN: usize = 64;

/// The two session keys, zeroed when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct MasterSecret {
    lookup_key: [u8; KEY_LEN],
    record_key: [u8; KEY_LEN],
}

impl MasterSecret {
    /// Run the KDF once over `password` and `salt` and split the output.
    pub fn derive(password: &[u8], salt: &[u8], params: &Argon2Params) -> Result<Self> {
        let mut material = derive_key_material(password, salt, params)?;
        let secret = Self::from_key_material(&material);
        material.zeroize();
        Ok(secret)
    }

    /// Split derived key material: lookup half first, record half second.
    pub fn from_key_material(material: &[u8; KEY_MATERIAL_LEN]) -> Self {
        let mut lookup_key = [0u8; KEY_LEN];
        let mut record_key = [0u8; KEY_LEN];
        lookup_key.copy_from_slice(&material[..KEY_LEN]);
        record_key.copy_from_slice(&material[KEY_LEN..]);
        Self {
            lookup_key,
            record_key,
        }
    }

    pub fn lookup_key(&self) -> &[u8; KEY_LEN] {
        &self.lookup_key
    }

    pub fn record_key(&self) -> &[u8; KEY_LEN] {
        &self.record_key
    }

    /// The record ID for `domain`: HMAC-SHA256 under the lookup key, hex encoded.
    pub fn record_id(&self, domain: &str) -> Result<String> {
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.lookup_key)
            .map_err(|e| VaultError::KeyDerivationFailed(format!("HMAC init failed: {e}")))?;
        mac.update(domain.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Encrypt a padded value under the record key, bound to `record_id`.
    pub fn seal_record(&self, record_id: &str, padded: &[u8]) -> Result<Vec<u8>> {
        encryption::encrypt(&self.record_key, padded, record_id.as_bytes())
    }

    /// Decrypt a record sealed for `record_id`.
    pub fn open_record(&self, record_id: &str, sealed: &[u8]) -> Result<Vec<u8>> {
        encryption::decrypt(&self.record_key, sealed, record_id.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material() -> [u8; KEY_MATERIAL_LEN] {
        let mut m = [0u8; KEY_MATERIAL_LEN];
        for (i, b) in m.iter_mut().enumerate() {
            *b = i as u8;
        }
        m
    }

    #[test]
    fn split_keeps_lookup_half_first() {
        let m = material();
        let secret = MasterSecret::from_key_material(&m);
        assert_eq!(secret.lookup_key()[..], m[..KEY_LEN]);
        assert_eq!(secret.record_key()[..], m[KEY_LEN..]);
        assert_ne!(secret.lookup_key(), secret.record_key());
    }

    #[test]
    fn record_id_is_fixed_width_hex() {
        let secret = MasterSecret::from_key_material(&material());
        let id = secret.record_id("www.example.com").unwrap();
        assert_eq!(id.len(), RECORD_ID_HEX_LEN);
        assert!(id.bytes().all(|b| b.is_ascii_hexdigit()));
        assert!(!id.contains("example"));
    }

    #[test]
    fn record_id_depends_on_lookup_key_only() {
        let a = MasterSecret::from_key_material(&material());
        let mut other = material();
        other[KEY_LEN] ^= 0xFF; // touch the record half only
        let b = MasterSecret::from_key_material(&other);
        assert_eq!(a.record_id("x.com").unwrap(), b.record_id("x.com").unwrap());
    }

    #[test]
    fn sealed_record_opens_only_under_its_id() {
        let secret = MasterSecret::from_key_material(&material());
        let id_a = secret.record_id("a.com").unwrap();
        let id_b = secret.record_id("b.com").unwrap();
        let sealed = secret.seal_record(&id_a, b"padded").unwrap();
        assert_eq!(secret.open_record(&id_a, &sealed).unwrap(), b"padded");
        assert!(secret.open_record(&id_b, &sealed).is_err());
    }
}
