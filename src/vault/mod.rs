//! Vault module — the password vault engine.
//!
//! This module provides:
//! - The `Vault` engine with its init/set/get/remove/dump/load operations (`engine`)
//! - The serialized `VaultStore` format and checksum (`format`)
//! - A mutex-guarded `SharedVault` handle (`shared`)
//! - Atomic dump files on disk (`file`)

pub mod engine;
pub mod file;
pub mod format;
pub mod shared;

// Re-export the most commonly used items.
pub use engine::Vault;
pub use file::{read_dump, write_dump, StoredDump};
pub use format::{VaultDump, VaultStore};
pub use shared::SharedVault;
