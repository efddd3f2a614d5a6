//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{VaultError, Result};
use crate::vault::{read_dump, write_dump, Vault};

/// Minimum password length to prevent trivially weak passwords.
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable consulted before prompting for the master password.
pub const PASSWORD_ENV: &str = "PWVAULT_PASSWORD";

/// pwvault CLI: local encrypted password vault.
#[derive(Parser)]
#[command(name = "pwvault", about = "Local encrypted password vault", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Dump file holding the vault (default: vault.json, or dump_file in .pwvault.toml)
    #[arg(long, global = true)]
    pub file: Option<String>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new, empty vault
    Init {
        /// Overwrite an existing vault file
        #[arg(long)]
        force: bool,
    },

    /// Store a credential for a domain (add or update)
    Set {
        /// Domain name (e.g. www.example.com)
        domain: String,
        /// Credential (omit for interactive prompt)
        value: Option<String>,
    },

    /// Print the credential stored for a domain
    Get {
        /// Domain name
        domain: String,
    },

    /// Remove the credential stored for a domain
    Remove {
        /// Domain name
        domain: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Check the vault file's checksum and password, then show a summary
    Verify,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the master password from `PWVAULT_PASSWORD` or an interactive prompt.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter master password")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation (used during `init`).
///
/// Also respects `PWVAULT_PASSWORD` for scripted usage.
/// Enforces a minimum password length.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            if pw.len() < MIN_PASSWORD_LEN {
                return Err(VaultError::CommandFailed(format!(
                    "password must be at least {MIN_PASSWORD_LEN} characters"
                )));
            }
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose master password")
            .with_confirmation(
                "Confirm master password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;

        if password.len() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

/// Load settings from the working directory.
pub fn load_settings() -> Result<(PathBuf, Settings)> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;
    Ok((cwd, settings))
}

/// Resolve the dump file path from `--file` or the settings.
pub fn dump_path(cli: &Cli, cwd: &std::path::Path, settings: &Settings) -> PathBuf {
    settings.dump_path(cwd, cli.file.as_deref())
}

/// Read the dump file, ask for the password and load the vault.
///
/// The stored checksum is always verified.  The keys are derived with
/// the Argon2 cost recorded in the file, not the current settings.  A
/// wrong password becomes `WrongPassword`.
pub fn open_vault(cli: &Cli) -> Result<(Vault, PathBuf)> {
    let (cwd, settings) = load_settings()?;
    let path = dump_path(cli, &cwd, &settings);

    let stored = read_dump(&path)?;
    let password = prompt_password()?;

    let mut vault = Vault::with_params(stored.params);
    if !vault.load(&password, &stored.dump.state, Some(&stored.dump.checksum))? {
        return Err(VaultError::WrongPassword);
    }
    Ok((vault, path))
}

/// Dump the vault and write it to `path` together with its Argon2 cost.
pub fn save_vault(vault: &Vault, path: &std::path::Path) -> Result<()> {
    let dump = vault.dump()?.ok_or(VaultError::NotInitialized)?;
    write_dump(path, &dump, vault.params())
}
