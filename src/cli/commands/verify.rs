//! `pwvault verify` — check a vault file and print a summary.
//!
//! Opening the vault already checks the stored checksum and the master
//! password; this command only reports the outcome.

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::{VaultError, Result};

/// Execute the `verify` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (vault, path) = open_vault(cli)?;

    let dump = vault.dump()?.ok_or(VaultError::NotInitialized)?;
    output::success("Checksum and master password verified.");
    output::print_vault_summary(
        &path,
        vault.record_count().unwrap_or_default(),
        &dump.checksum,
    );

    Ok(())
}
