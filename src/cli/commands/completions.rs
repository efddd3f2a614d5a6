//! `pwvault completions` — print a shell completion script.
//!
//! Usage:
//!   pwvault completions bash > ~/.bash_completion.d/pwvault
//!   pwvault completions zsh

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `completions` command.
pub fn execute(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "pwvault", &mut io::stdout());
    Ok(())
}
