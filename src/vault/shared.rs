//! A `Vault` that can be shared across threads.
//!
//! Every operation, reads included, takes the same lock, so a `load`
//! (verify then replace) is atomic with respect to concurrent `get`
//! and `set` calls.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::crypto::kdf::Argon2Params;
use crate::errors::{VaultError, Result};

use super::engine::Vault;
use super::format::VaultDump;

/// Cloneable handle to one vault behind a mutex.
#[derive(Clone, Default)]
pub struct SharedVault {
    inner: Arc<Mutex<Vault>>,
}

impl SharedVault {
    pub fn new(vault: Vault) -> Self {
        Self {
            inner: Arc::new(Mutex::new(vault)),
        }
    }

    pub fn with_params(params: Argon2Params) -> Self {
        Self::new(Vault::with_params(params))
    }

    pub fn init(&self, password: &str) -> Result<()> {
        self.lock()?.init(password)
    }

    pub fn set(&self, domain: &str, value: &str) -> Result<bool> {
        self.lock()?.set(domain, value)
    }

    pub fn get(&self, domain: &str) -> Result<Option<String>> {
        self.lock()?.get(domain)
    }

    pub fn remove(&self, domain: &str) -> Result<bool> {
        self.lock()?.remove(domain)
    }

    pub fn dump(&self) -> Result<Option<VaultDump>> {
        self.lock()?.dump()
    }

    pub fn load(
        &self,
        password: &str,
        serialized: &str,
        trusted_checksum: Option<&str>,
    ) -> Result<bool> {
        self.lock()?.load(password, serialized, trusted_checksum)
    }

    pub fn is_ready(&self) -> Result<bool> {
        Ok(self.lock()?.is_ready())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vault>> {
        self.inner.lock().map_err(|_| VaultError::LockPoisoned)
    }
}
