//! `pwvault init` — create a new, empty vault file.

use crate::cli::output;
use crate::cli::{dump_path, load_settings, prompt_new_password, save_vault, Cli};
use crate::errors::{VaultError, Result};
use crate::vault::Vault;

/// Execute the `init` command.
pub fn execute(cli: &Cli, force: bool) -> Result<()> {
    let (cwd, settings) = load_settings()?;
    let path = dump_path(cli, &cwd, &settings);

    // 1. Refuse to clobber an existing vault unless asked to.
    if path.exists() && !force {
        output::tip("Use `pwvault set <DOMAIN>` to add credentials to the existing vault.");
        return Err(VaultError::VaultAlreadyExists(path));
    }

    // 2. Prompt for a new password (with confirmation).
    let password = prompt_new_password()?;

    // 3. Derive keys and write the empty vault.
    let mut vault = Vault::with_params(settings.argon2_params());
    vault.init(&password)?;
    save_vault(&vault, &path)?;

    output::success(&format!("Vault created at {}", path.display()));
    output::tip("Run `pwvault set <DOMAIN>` to store a credential.");

    Ok(())
}
