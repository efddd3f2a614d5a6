//! On-disk dump files.
//!
//! A dump file is a small JSON envelope:
//!
//! ```text
//! {"version":1,"kdf":{"memory_kib":..,"iterations":..,"parallelism":..},
//!  "state":"<serialized vault>","checksum":"<sha-256 hex>"}
//! ```
//!
//! The serialized vault is kept as a string, byte for byte, so the
//! checksum still matches after the file round trip.  The Argon2id cost
//! the vault was created with travels alongside it: the keys can only be
//! re-derived with the same cost.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::Argon2Params;
use crate::errors::{VaultError, Result};

use super::format::VaultDump;

/// Current dump file envelope version.
pub const CURRENT_VERSION: u8 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct DumpFile {
    version: u8,
    kdf: Argon2Params,
    state: String,
    checksum: String,
}

/// A dump read back from disk, with the KDF cost needed to open it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDump {
    pub dump: VaultDump,
    pub params: Argon2Params,
}

/// Write a dump to disk **atomically**.
///
/// Writes to an owner-only temp file in the same directory, then renames
/// it over `path` so readers never see a half-written file.
pub fn write_dump(path: &Path, dump: &VaultDump, params: &Argon2Params) -> Result<()> {
    let file = DumpFile {
        version: CURRENT_VERSION,
        kdf: *params,
        state: dump.state.clone(),
        checksum: dump.checksum.clone(),
    };
    let bytes = serde_json::to_vec_pretty(&file)
        .map_err(|e| VaultError::SerializationError(format!("dump file: {e}")))?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    // A leftover temp file may carry looser permissions; start fresh.
    match fs::remove_file(&tmp_path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    if let Err(e) = write_private(&tmp_path, &bytes).and_then(|()| fs::rename(&tmp_path, path)) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    tracing::debug!(path = %path.display(), "dump file written");
    Ok(())
}

/// Create `path` (which must not exist) readable by the owner only, and
/// write `bytes` to it.
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Read a dump file written by `write_dump`.
pub fn read_dump(path: &Path) -> Result<StoredDump> {
    if !path.exists() {
        return Err(VaultError::VaultNotFound(path.to_path_buf()));
    }

    let data = fs::read(path)?;
    let file: DumpFile = serde_json::from_slice(&data)
        .map_err(|e| VaultError::InvalidVaultFormat(format!("dump file JSON: {e}")))?;

    if file.version != CURRENT_VERSION {
        return Err(VaultError::InvalidVaultFormat(format!(
            "unsupported dump file version {}, expected {CURRENT_VERSION}",
            file.version
        )));
    }
    file.kdf
        .validate()
        .map_err(|e| VaultError::InvalidVaultFormat(format!("kdf: {e}")))?;

    Ok(StoredDump {
        dump: VaultDump {
            state: file.state,
            checksum: file.checksum,
        },
        params: file.kdf,
    })
}
