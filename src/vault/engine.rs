//! The vault engine: init / set / get / remove / dump / load.
//!
//! `Vault` is a two-state machine.  It starts `Uninitialized`; `init`
//! or a successful `load` moves it to `Ready`, which owns the store and
//! the session keys together.  Record operations on an uninitialized
//! vault fail with `NotInitialized` and change nothing.

use tracing::{debug, info, trace, warn};
use zeroize::Zeroize;

use crate::crypto::digest::{digest_eq, sha256_hex};
use crate::crypto::kdf::{generate_salt, Argon2Params};
use crate::crypto::keys::MasterSecret;
use crate::crypto::padding::{pad, unpad};
use crate::errors::{VaultError, Result};

use super::format::{verify_checksum, VaultDump, VaultStore};

/// Store and keys of an open vault.  They are only ever replaced together.
struct Unlocked {
    store: VaultStore,
    secret: MasterSecret,
}

enum VaultState {
    Uninitialized,
    Ready(Box<Unlocked>),
}

/// A password vault holding per-domain credentials.
pub struct Vault {
    params: Argon2Params,
    state: VaultState,
}

impl Default for Vault {
    fn default() -> Self {
        Self::new()
    }
}

impl Vault {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// An uninitialized vault using the default Argon2id cost.
    pub fn new() -> Self {
        Self::with_params(Argon2Params::default())
    }

    /// An uninitialized vault using the given Argon2id cost for
    /// `init` and `load`.
    pub fn with_params(params: Argon2Params) -> Self {
        Self {
            params,
            state: VaultState::Uninitialized,
        }
    }

    /// Create an empty vault protected by `password`.
    ///
    /// Generates a fresh salt and discards any state this instance held
    /// before; callers that need the old contents must `dump` first.
    pub fn init(&mut self, password: &str) -> Result<()> {
        let salt = generate_salt()?;
        let fingerprint = sha256_hex(password.as_bytes());
        let secret = MasterSecret::derive(password.as_bytes(), &salt, &self.params)?;

        self.state = VaultState::Ready(Box::new(Unlocked {
            store: VaultStore::new(&salt, fingerprint),
            secret,
        }));
        info!("initialized empty vault");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Record operations
    // ------------------------------------------------------------------

    /// Store `value` for `domain`, replacing any existing record.
    ///
    /// Returns whether a record was replaced.  The old record is never
    /// decrypted, so a corrupted one can still be overwritten.
    pub fn set(&mut self, domain: &str, value: &str) -> Result<bool> {
        let unlocked = self.unlocked_mut()?;

        let record_id = unlocked.secret.record_id(domain)?;
        let padded = pad(value)?;
        let sealed = unlocked.secret.seal_record(&record_id, &padded)?;

        let replaced = unlocked.store.put_record(record_id, hex::encode(sealed));
        trace!(replaced, records = unlocked.store.record_count(), "record stored");
        Ok(replaced)
    }

    /// Look up the credential for `domain`.
    ///
    /// `Ok(None)` means no record exists.  A record that fails
    /// authentication is an error, never `None`.
    pub fn get(&self, domain: &str) -> Result<Option<String>> {
        let unlocked = self.unlocked()?;

        let record_id = unlocked.secret.record_id(domain)?;
        let Some(record_hex) = unlocked.store.record(&record_id) else {
            return Ok(None);
        };

        let opened = hex::decode(record_hex)
            .map_err(|_| VaultError::RecordTampered)
            .and_then(|sealed| unlocked.secret.open_record(&record_id, &sealed));
        let mut padded = match opened {
            Ok(padded) => padded,
            Err(e) => {
                warn!("record failed authentication");
                return Err(e);
            }
        };

        let value = unpad(&padded);
        padded.zeroize();
        value.map(Some)
    }

    /// Delete the record for `domain`.  Returns whether one existed.
    pub fn remove(&mut self, domain: &str) -> Result<bool> {
        let unlocked = self.unlocked_mut()?;

        let record_id = unlocked.secret.record_id(domain)?;
        let removed = unlocked.store.remove_record(&record_id);
        trace!(removed, records = unlocked.store.record_count(), "record removal");
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Export / import
    // ------------------------------------------------------------------

    /// Serialize the vault and compute its checksum.
    ///
    /// Returns `Ok(None)` when the vault is not initialized.
    pub fn dump(&self) -> Result<Option<VaultDump>> {
        let VaultState::Ready(unlocked) = &self.state else {
            debug!("dump requested on uninitialized vault");
            return Ok(None);
        };
        let dump = VaultDump::from_store(&unlocked.store)?;
        debug!(records = unlocked.store.record_count(), "vault dumped");
        Ok(Some(dump))
    }

    /// Replace this vault with a serialized one.
    ///
    /// 1. If `trusted_checksum` is given, verify it over the exact bytes
    ///    of `serialized` (`ChecksumMismatch` on failure).
    /// 2. Parse the candidate (`InvalidVaultFormat` on failure).
    /// 3. Check the password fingerprint; a wrong password returns
    ///    `Ok(false)` and leaves the current state untouched.
    /// 4. Re-derive the keys from the candidate's salt.
    /// 5. Install the candidate store and keys together.
    pub fn load(
        &mut self,
        password: &str,
        serialized: &str,
        trusted_checksum: Option<&str>,
    ) -> Result<bool> {
        if let Some(trusted) = trusted_checksum {
            if let Err(e) = verify_checksum(serialized, trusted) {
                warn!("vault load rejected: checksum mismatch");
                return Err(e);
            }
        }

        let candidate = VaultStore::parse(serialized)?;

        if !digest_eq(
            candidate.password_fingerprint(),
            &sha256_hex(password.as_bytes()),
        ) {
            warn!("vault load rejected: wrong password");
            return Ok(false);
        }

        let salt = candidate.salt()?;
        let secret = MasterSecret::derive(password.as_bytes(), &salt, &self.params)?;

        let records = candidate.record_count();
        self.state = VaultState::Ready(Box::new(Unlocked {
            store: candidate,
            secret,
        }));
        info!(records, "vault loaded");
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn is_ready(&self) -> bool {
        matches!(self.state, VaultState::Ready(_))
    }

    /// Number of stored records, or `None` when not initialized.
    pub fn record_count(&self) -> Option<usize> {
        match &self.state {
            VaultState::Ready(unlocked) => Some(unlocked.store.record_count()),
            VaultState::Uninitialized => None,
        }
    }

    pub fn params(&self) -> &Argon2Params {
        &self.params
    }

    fn unlocked(&self) -> Result<&Unlocked> {
        match &self.state {
            VaultState::Ready(unlocked) => Ok(unlocked),
            VaultState::Uninitialized => Err(VaultError::NotInitialized),
        }
    }

    fn unlocked_mut(&mut self) -> Result<&mut Unlocked> {
        match &mut self.state {
            VaultState::Ready(unlocked) => Ok(unlocked),
            VaultState::Uninitialized => Err(VaultError::NotInitialized),
        }
    }
}
