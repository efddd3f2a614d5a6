use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in pwvault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- State errors ---
    #[error("Vault is not initialized — call init or load first")]
    NotInitialized,

    #[error("Value is {len} bytes, the maximum is {max}")]
    ValueTooLong { len: usize, max: usize },

    // --- Integrity errors ---
    #[error("Checksum mismatch — the serialized vault was modified")]
    ChecksumMismatch,

    #[error("Record failed authentication — vault contents may be tampered")]
    RecordTampered,

    // --- Crypto errors ---
    #[error("Randomness unavailable: {0}")]
    RandomnessUnavailable(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    // --- Format errors ---
    #[error("Invalid vault format: {0}")]
    InvalidVaultFormat(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- Dump file errors ---
    #[error("Vault not found at {0}")]
    VaultNotFound(PathBuf),

    #[error("Vault already exists at {0} (use --force to overwrite)")]
    VaultAlreadyExists(PathBuf),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Wrong master password")]
    WrongPassword,

    #[error("No entry for domain '{0}'")]
    DomainNotFound(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Vault lock poisoned by a panicking thread")]
    LockPoisoned,
}

impl VaultError {
    /// True for errors that mean the vault data was altered or corrupted.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(self, Self::ChecksumMismatch | Self::RecordTampered)
    }

    /// True for failures of the primitive layer itself (randomness, KDF, cipher).
    pub fn is_fatal_crypto(&self) -> bool {
        matches!(
            self,
            Self::RandomnessUnavailable(_)
                | Self::KeyDerivationFailed(_)
                | Self::EncryptionFailed(_)
        )
    }
}

/// Convenience type alias for pwvault results.
pub type Result<T> = std::result::Result<T, VaultError>;
