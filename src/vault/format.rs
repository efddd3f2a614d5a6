//! Serialized vault format and checksum.
//!
//! A dumped vault is a compact JSON document with exactly three fields:
//!
//! ```text
//! {"keySalt":"<64 hex>","passwordFingerprint":"<64 hex>","kvs":{"<record id>":"<record>",...}}
//! ```
//!
//! - **keySalt**: Argon2id salt, cleartext.
//! - **passwordFingerprint**: SHA-256 of the master password.
//! - **kvs**: record ID (HMAC of the domain) -> nonce || ciphertext || tag,
//!   all lowercase hex.  Keys are sorted, so the same store always
//!   serializes to the same bytes.
//!
//! The checksum is SHA-256 over those exact bytes.  It travels next to
//! the document, never inside it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::crypto::digest::{digest_eq, is_lower_hex, sha256_hex, DIGEST_HEX_LEN};
use crate::crypto::keys::RECORD_ID_HEX_LEN;
use crate::errors::{VaultError, Result};

/// Length of the hex-encoded salt.
const SALT_HEX_LEN: usize = crate::crypto::kdf::SALT_LEN * 2;

// ---------------------------------------------------------------------------
// VaultStore
// ---------------------------------------------------------------------------

/// The persisted unit: salt, password fingerprint and encrypted records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VaultStore {
    key_salt: String,
    password_fingerprint: String,
    kvs: BTreeMap<String, String>,
}

impl VaultStore {
    /// An empty store for a freshly initialized vault.
    pub fn new(salt: &[u8], password_fingerprint: String) -> Self {
        Self {
            key_salt: hex::encode(salt),
            password_fingerprint,
            kvs: BTreeMap::new(),
        }
    }

    /// Parse and validate a serialized store.
    ///
    /// Rejects unknown or missing fields and any field that is not
    /// lowercase hex of the expected width.
    pub fn parse(serialized: &str) -> Result<Self> {
        let store: Self = serde_json::from_str(serialized)
            .map_err(|e| VaultError::InvalidVaultFormat(format!("vault JSON: {e}")))?;
        store.validate()?;
        Ok(store)
    }

    /// Serialize to the canonical text form.
    pub fn to_canonical_string(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| VaultError::SerializationError(format!("vault: {e}")))
    }

    /// Decoded salt bytes.
    pub fn salt(&self) -> Result<Vec<u8>> {
        hex::decode(&self.key_salt)
            .map_err(|e| VaultError::InvalidVaultFormat(format!("keySalt: {e}")))
    }

    pub fn password_fingerprint(&self) -> &str {
        &self.password_fingerprint
    }

    pub fn record(&self, record_id: &str) -> Option<&str> {
        self.kvs.get(record_id).map(String::as_str)
    }

    /// Insert or replace a record.  Returns true if one was replaced.
    pub fn put_record(&mut self, record_id: String, record_hex: String) -> bool {
        self.kvs.insert(record_id, record_hex).is_some()
    }

    pub fn remove_record(&mut self, record_id: &str) -> bool {
        self.kvs.remove(record_id).is_some()
    }

    pub fn record_count(&self) -> usize {
        self.kvs.len()
    }

    fn validate(&self) -> Result<()> {
        if !is_lower_hex(&self.key_salt, SALT_HEX_LEN) {
            return Err(VaultError::InvalidVaultFormat(format!(
                "keySalt must be {SALT_HEX_LEN} lowercase hex characters"
            )));
        }
        if !is_lower_hex(&self.password_fingerprint, DIGEST_HEX_LEN) {
            return Err(VaultError::InvalidVaultFormat(format!(
                "passwordFingerprint must be {DIGEST_HEX_LEN} lowercase hex characters"
            )));
        }
        for (id, record) in &self.kvs {
            if !is_lower_hex(id, RECORD_ID_HEX_LEN) {
                return Err(VaultError::InvalidVaultFormat(format!(
                    "record ID '{id}' must be {RECORD_ID_HEX_LEN} lowercase hex characters"
                )));
            }
            if record.is_empty() || !is_lower_hex(record, record.len()) || record.len() % 2 != 0 {
                return Err(VaultError::InvalidVaultFormat(format!(
                    "record '{id}' is not lowercase hex"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Dump + checksum
// ---------------------------------------------------------------------------

/// A serialized vault and the checksum over its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultDump {
    pub state: String,
    pub checksum: String,
}

impl VaultDump {
    /// Serialize `store` and compute its checksum.
    pub fn from_store(store: &VaultStore) -> Result<Self> {
        let state = store.to_canonical_string()?;
        let checksum = checksum(&state);
        Ok(Self { state, checksum })
    }
}

/// SHA-256 over the serialized vault, hex encoded.
pub fn checksum(serialized: &str) -> String {
    sha256_hex(serialized.as_bytes())
}

/// Check `serialized` against a trusted checksum in constant time.
pub fn verify_checksum(serialized: &str, trusted_checksum: &str) -> Result<()> {
    if digest_eq(trusted_checksum, &checksum(serialized)) {
        Ok(())
    } else {
        Err(VaultError::ChecksumMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_record() -> VaultStore {
        let mut store = VaultStore::new(&[7u8; 32], sha256_hex(b"pw"));
        store.put_record("a".repeat(64), "0123abcd".into());
        store
    }

    #[test]
    fn serializes_exactly_three_fields() {
        let text = store_with_record().to_canonical_string().unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert!(obj.contains_key("keySalt"));
        assert!(obj.contains_key("passwordFingerprint"));
        assert!(obj.contains_key("kvs"));
    }

    #[test]
    fn serialization_is_deterministic() {
        let mut a = VaultStore::new(&[1u8; 32], sha256_hex(b"pw"));
        let mut b = a.clone();
        a.put_record("1".repeat(64), "aa".into());
        a.put_record("2".repeat(64), "bb".into());
        b.put_record("2".repeat(64), "bb".into());
        b.put_record("1".repeat(64), "aa".into());
        assert_eq!(
            a.to_canonical_string().unwrap(),
            b.to_canonical_string().unwrap()
        );
    }

    #[test]
    fn parse_roundtrips() {
        let store = store_with_record();
        let text = store.to_canonical_string().unwrap();
        assert_eq!(VaultStore::parse(&text).unwrap(), store);
    }

    #[test]
    fn parse_rejects_unknown_field() {
        let text = format!(
            r#"{{"keySalt":"{}","passwordFingerprint":"{}","kvs":{{}},"extra":1}}"#,
            "0".repeat(64),
            "0".repeat(64)
        );
        assert!(matches!(
            VaultStore::parse(&text),
            Err(VaultError::InvalidVaultFormat(_))
        ));
    }

    #[test]
    fn parse_rejects_missing_kvs() {
        let text = format!(
            r#"{{"keySalt":"{}","passwordFingerprint":"{}"}}"#,
            "0".repeat(64),
            "0".repeat(64)
        );
        assert!(VaultStore::parse(&text).is_err());
    }

    #[test]
    fn parse_rejects_short_salt_and_bad_ids() {
        let short_salt = format!(
            r#"{{"keySalt":"abcd","passwordFingerprint":"{}","kvs":{{}}}}"#,
            "0".repeat(64)
        );
        assert!(VaultStore::parse(&short_salt).is_err());

        let bad_id = format!(
            r#"{{"keySalt":"{}","passwordFingerprint":"{}","kvs":{{"www.example.com":"00"}}}}"#,
            "0".repeat(64),
            "0".repeat(64)
        );
        assert!(VaultStore::parse(&bad_id).is_err());

        let odd_record = format!(
            r#"{{"keySalt":"{}","passwordFingerprint":"{}","kvs":{{"{}":"abc"}}}}"#,
            "0".repeat(64),
            "0".repeat(64),
            "0".repeat(64)
        );
        assert!(VaultStore::parse(&odd_record).is_err());
    }

    #[test]
    fn checksum_detects_any_change() {
        let dump = VaultDump::from_store(&store_with_record()).unwrap();
        assert!(verify_checksum(&dump.state, &dump.checksum).is_ok());

        let altered = dump.state.replacen("0123", "0124", 1);
        assert!(matches!(
            verify_checksum(&altered, &dump.checksum),
            Err(VaultError::ChecksumMismatch)
        ));
    }

    #[test]
    fn malformed_checksum_is_a_mismatch() {
        let dump = VaultDump::from_store(&store_with_record()).unwrap();
        assert!(verify_checksum(&dump.state, "zz").is_err());
        assert!(verify_checksum(&dump.state, "").is_err());
    }
}
