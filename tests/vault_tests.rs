//! Integration tests for the pwvault engine: record operations,
//! dump/load, and tamper detection.

use std::collections::BTreeMap;

use pwvault::crypto::Argon2Params;
use pwvault::errors::VaultError;
use pwvault::vault::Vault;

/// Helper: an uninitialized vault with the cheapest KDF cost.
fn fresh_vault() -> Vault {
    Vault::with_params(Argon2Params::minimum())
}

/// Helper: a ready vault protected by `password`.
fn ready_vault(password: &str) -> Vault {
    let mut vault = fresh_vault();
    vault.init(password).expect("init vault");
    vault
}

/// Replace the record stored under `id` in a serialized vault.
fn edit_kvs(state: &str, edit: impl FnOnce(&mut BTreeMap<String, String>)) -> String {
    let mut value: serde_json::Value = serde_json::from_str(state).unwrap();
    let mut kvs: BTreeMap<String, String> =
        serde_json::from_value(value["kvs"].take()).unwrap();
    edit(&mut kvs);
    value["kvs"] = serde_json::to_value(kvs).unwrap();
    serde_json::to_string(&value).unwrap()
}

// ---------------------------------------------------------------------------
// Concrete scenarios
// ---------------------------------------------------------------------------

#[test]
fn set_get_remove_dump_load_scenario() {
    let mut vault = ready_vault("p1");
    vault.set("a.com", "secretA").unwrap();
    vault.set("b.com", "secretB").unwrap();
    assert_eq!(vault.get("a.com").unwrap().as_deref(), Some("secretA"));

    assert!(vault.remove("a.com").unwrap());
    assert_eq!(vault.get("a.com").unwrap(), None);

    let dump = vault.dump().unwrap().expect("ready vault dumps");

    let mut restored = fresh_vault();
    assert!(restored
        .load("p1", &dump.state, Some(&dump.checksum))
        .unwrap());
    assert_eq!(restored.get("b.com").unwrap().as_deref(), Some("secretB"));
    assert_eq!(restored.get("a.com").unwrap(), None);
}

#[test]
fn load_with_wrong_password_returns_false() {
    let mut vault = ready_vault("p1");
    vault.set("x.com", "v").unwrap();
    let dump = vault.dump().unwrap().unwrap();

    let mut other = fresh_vault();
    assert!(!other.load("wrong", &dump.state, None).unwrap());
    assert!(!other.is_ready());
}

// ---------------------------------------------------------------------------
// Record semantics
// ---------------------------------------------------------------------------

#[test]
fn unset_domain_returns_none() {
    let vault = ready_vault("pw");
    assert_eq!(vault.get("never-set.com").unwrap(), None);
}

#[test]
fn remove_returns_true_exactly_once() {
    let mut vault = ready_vault("pw");
    vault.set("a.com", "x").unwrap();
    assert!(vault.remove("a.com").unwrap());
    assert!(!vault.remove("a.com").unwrap());
    assert!(!vault.remove("never-set.com").unwrap());
}

#[test]
fn value_with_embedded_nul_roundtrips() {
    let mut vault = ready_vault("pw");
    vault.set("nul.com", "ab\0cd\0").unwrap();
    vault.set("empty.com", "").unwrap();
    assert_eq!(vault.get("nul.com").unwrap().as_deref(), Some("ab\0cd\0"));
    assert_eq!(vault.get("empty.com").unwrap().as_deref(), Some(""));
}

#[test]
fn value_at_and_over_the_limit() {
    let mut vault = ready_vault("pw");
    let max = "m".repeat(64);
    vault.set("max.com", &max).unwrap();
    assert_eq!(vault.get("max.com").unwrap(), Some(max));

    let err = vault.set("over.com", &"o".repeat(65)).unwrap_err();
    assert!(matches!(err, VaultError::ValueTooLong { len: 65, max: 64 }));
    assert_eq!(vault.get("over.com").unwrap(), None);
}

// ---------------------------------------------------------------------------
// Dump / load
// ---------------------------------------------------------------------------

#[test]
fn wrong_password_leaves_existing_state_untouched() {
    let mut source = ready_vault("other-pw");
    source.set("z.com", "zzz").unwrap();
    let foreign = source.dump().unwrap().unwrap();

    let mut vault = ready_vault("mine");
    vault.set("a.com", "keep-me").unwrap();

    assert!(!vault
        .load("not-other-pw", &foreign.state, Some(&foreign.checksum))
        .unwrap());
    assert!(vault.is_ready());
    assert_eq!(vault.get("a.com").unwrap().as_deref(), Some("keep-me"));
    assert_eq!(vault.get("z.com").unwrap(), None);
}

#[test]
fn successful_load_replaces_existing_state() {
    let mut source = ready_vault("pw-a");
    source.set("a.com", "from-a").unwrap();
    let dump = source.dump().unwrap().unwrap();

    let mut vault = ready_vault("pw-b");
    vault.set("b.com", "from-b").unwrap();

    assert!(vault.load("pw-a", &dump.state, Some(&dump.checksum)).unwrap());
    assert_eq!(vault.get("a.com").unwrap().as_deref(), Some("from-a"));
    assert_eq!(vault.get("b.com").unwrap(), None);
}

#[test]
fn reloaded_vault_accepts_new_records() {
    let mut vault = ready_vault("pw");
    vault.set("a.com", "1").unwrap();
    let dump = vault.dump().unwrap().unwrap();

    let mut restored = fresh_vault();
    assert!(restored.load("pw", &dump.state, None).unwrap());
    restored.set("b.com", "2").unwrap();

    let second = restored.dump().unwrap().unwrap();
    let mut again = fresh_vault();
    assert!(again.load("pw", &second.state, Some(&second.checksum)).unwrap());
    assert_eq!(again.get("a.com").unwrap().as_deref(), Some("1"));
    assert_eq!(again.get("b.com").unwrap().as_deref(), Some("2"));
}

#[test]
fn dump_is_stable_without_changes() {
    let mut vault = ready_vault("pw");
    vault.set("a.com", "x").unwrap();
    let first = vault.dump().unwrap().unwrap();
    let second = vault.dump().unwrap().unwrap();
    assert_eq!(first, second);
}

#[test]
fn load_without_checksum_skips_blob_check() {
    let mut vault = ready_vault("pw");
    vault.set("a.com", "x").unwrap();
    let dump = vault.dump().unwrap().unwrap();

    let mut restored = fresh_vault();
    assert!(restored.load("pw", &dump.state, None).unwrap());
}

// ---------------------------------------------------------------------------
// Tamper detection
// ---------------------------------------------------------------------------

#[test]
fn altered_blob_with_checksum_is_an_integrity_error() {
    let mut vault = ready_vault("pw");
    vault.set("a.com", "x").unwrap();
    let dump = vault.dump().unwrap().unwrap();

    // Change the salt: a cleartext field nothing else authenticates.
    let tampered = {
        let mut value: serde_json::Value = serde_json::from_str(&dump.state).unwrap();
        value["keySalt"] = serde_json::Value::String("0".repeat(64));
        serde_json::to_string(&value).unwrap()
    };

    let mut restored = fresh_vault();
    let err = restored
        .load("pw", &tampered, Some(&dump.checksum))
        .unwrap_err();
    assert!(matches!(err, VaultError::ChecksumMismatch));
    assert!(!restored.is_ready());
}

#[test]
fn checksum_is_checked_before_the_password() {
    let vault = ready_vault("pw");
    let dump = vault.dump().unwrap().unwrap();
    let tampered = format!("{} ", dump.state);

    let mut restored = fresh_vault();
    let err = restored
        .load("wrong-password", &tampered, Some(&dump.checksum))
        .unwrap_err();
    assert!(err.is_integrity_failure());
}

#[test]
fn bit_flip_in_record_is_an_integrity_error() {
    let mut vault = ready_vault("pw");
    vault.set("a.com", "secret").unwrap();
    let dump = vault.dump().unwrap().unwrap();

    let tampered = edit_kvs(&dump.state, |kvs| {
        let record = kvs.values_mut().next().unwrap();
        // Flip the lowest bit of the last hex digit (inside the tag).
        let last = record.pop().unwrap();
        let flipped = u8::from_str_radix(&last.to_string(), 16).unwrap() ^ 1;
        record.push(char::from_digit(u32::from(flipped), 16).unwrap());
    });

    let mut restored = fresh_vault();
    assert!(restored.load("pw", &tampered, None).unwrap());
    let err = restored.get("a.com").unwrap_err();
    assert!(matches!(err, VaultError::RecordTampered));
}

#[test]
fn corrupted_record_can_be_overwritten() {
    let mut vault = ready_vault("pw");
    vault.set("a.com", "old").unwrap();
    let dump = vault.dump().unwrap().unwrap();

    let tampered = edit_kvs(&dump.state, |kvs| {
        let record = kvs.values_mut().next().unwrap();
        // Overwrite one ciphertext byte (after the 24-hex-digit nonce).
        let byte = if &record[30..32] == "00" { "ff" } else { "00" };
        record.replace_range(30..32, byte);
    });

    let mut restored = fresh_vault();
    assert!(restored.load("pw", &tampered, None).unwrap());
    assert!(restored.get("a.com").unwrap_err().is_integrity_failure());

    assert!(restored.set("a.com", "new").unwrap());
    assert_eq!(restored.get("a.com").unwrap().as_deref(), Some("new"));
    assert_eq!(restored.record_count(), Some(1));
}

#[test]
fn swapped_records_are_detected() {
    let mut vault = ready_vault("pw");
    vault.set("a.com", "password-a").unwrap();
    vault.set("b.com", "password-b").unwrap();
    let dump = vault.dump().unwrap().unwrap();

    let tampered = edit_kvs(&dump.state, |kvs| {
        let ids: Vec<String> = kvs.keys().cloned().collect();
        let first = kvs[&ids[0]].clone();
        let second = kvs[&ids[1]].clone();
        kvs.insert(ids[0].clone(), second);
        kvs.insert(ids[1].clone(), first);
    });

    let mut restored = fresh_vault();
    assert!(restored.load("pw", &tampered, None).unwrap());
    assert!(restored.get("a.com").unwrap_err().is_integrity_failure());
    assert!(restored.get("b.com").unwrap_err().is_integrity_failure());
}

#[test]
fn malformed_blob_is_a_format_error() {
    let mut vault = fresh_vault();
    let err = vault.load("pw", "{not json", None).unwrap_err();
    assert!(matches!(err, VaultError::InvalidVaultFormat(_)));
    assert!(!vault.is_ready());
}

// ---------------------------------------------------------------------------
// Uninitialized state
// ---------------------------------------------------------------------------

#[test]
fn operations_before_init_fail_without_side_effects() {
    let mut vault = fresh_vault();
    assert!(matches!(vault.set("a", "b"), Err(VaultError::NotInitialized)));
    assert!(matches!(vault.get("a"), Err(VaultError::NotInitialized)));
    assert!(matches!(vault.remove("a"), Err(VaultError::NotInitialized)));
    assert!(vault.dump().unwrap().is_none());
    assert!(!vault.is_ready());
}
