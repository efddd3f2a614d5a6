//! Cryptographic primitives for pwvault.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - Argon2id password-based key derivation (`kdf`)
//! - Lookup/record key separation and record IDs (`keys`)
//! - SHA-256 digests and constant-time digest comparison (`digest`)
//! - Fixed-length record padding (`padding`)

pub mod digest;
pub mod encryption;
pub mod kdf;
pub mod keys;
pub mod padding;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, MasterSecret, ...};
pub use digest::{digest_eq, sha256_hex};
pub use encryption::{decrypt, encrypt};
pub use kdf::{derive_key_material, generate_salt, Argon2Params};
pub use keys::MasterSecret;
pub use padding::{pad, unpad, MAX_VALUE_LEN};
