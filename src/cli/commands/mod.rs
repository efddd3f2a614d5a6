//! One module per `pwvault` subcommand.

pub mod completions;
pub mod get;
pub mod init;
pub mod remove;
pub mod set;
pub mod verify;
