//! `pwvault get` — print the credential stored for a domain.

use crate::cli::{open_vault, Cli};
use crate::errors::{VaultError, Result};

/// Execute the `get` command.
pub fn execute(cli: &Cli, domain: &str) -> Result<()> {
    let (vault, _path) = open_vault(cli)?;

    let value = vault
        .get(domain)?
        .ok_or_else(|| VaultError::DomainNotFound(domain.to_string()))?;
    println!("{value}");

    Ok(())
}
