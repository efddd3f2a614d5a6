//! `pwvault set` — add or update the credential for a domain.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{open_vault, save_vault, Cli};
use crate::errors::{VaultError, Result};

/// Execute the `set` command.
pub fn execute(cli: &Cli, domain: &str, value: Option<&str>) -> Result<()> {
    // Determine the credential from one of three sources.
    let credential = if let Some(v) = value {
        // Source 1: Inline value on the command line.
        output::warning("Value provided on command line — it may appear in shell history.");
        Zeroizing::new(v.to_string())
    } else if !io::stdin().is_terminal() {
        // Source 2: Piped input (stdin is not a terminal).
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut *buf)?;
        Zeroizing::new(strip_line_ending(&buf).to_string())
    } else {
        // Source 3: Interactive secure prompt (default).
        let v = dialoguer::Password::new()
            .with_prompt(format!("Enter credential for {domain}"))
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
        Zeroizing::new(v)
    };

    let (mut vault, path) = open_vault(cli)?;

    let replaced = vault.set(domain, &credential)?;
    save_vault(&vault, &path)?;

    let verb = if replaced { "updated" } else { "added" };
    output::success(&format!(
        "Credential for '{domain}' {verb} ({} total)",
        vault.record_count().unwrap_or_default()
    ));

    Ok(())
}

/// Drop one trailing `\n` or `\r\n` left by `echo` and friends.
/// Any other trailing whitespace belongs to the credential.
fn strip_line_ending(input: &str) -> &str {
    input
        .strip_suffix("\r\n")
        .or_else(|| input.strip_suffix('\n'))
        .unwrap_or(input)
}
