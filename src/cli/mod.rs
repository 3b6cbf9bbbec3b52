//! CLI module
//!
//! - serve: boot the server and block until Ctrl-C
//! - check-config: validate a config file and print the resolved settings

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check_config, resolve_config, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
