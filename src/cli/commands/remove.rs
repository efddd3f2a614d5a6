//! `pwvault remove` — delete the credential stored for a domain.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{open_vault, save_vault, Cli};
use crate::errors::{VaultError, Result};

/// Execute the `remove` command.
pub fn execute(cli: &Cli, domain: &str, force: bool) -> Result<()> {
    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove credential for '{domain}'?"))
            .default(false)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let (mut vault, path) = open_vault(cli)?;

    if !vault.remove(domain)? {
        return Err(VaultError::DomainNotFound(domain.to_string()));
    }
    save_vault(&vault, &path)?;

    output::success(&format!("Removed credential for '{domain}'"));

    Ok(())
}
