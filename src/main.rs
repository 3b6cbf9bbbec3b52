//! pulse_api CLI entry point
//!
//! Parses arguments and dispatches to the CLI module; prints any error to
//! stderr and exits non-zero.

use pulse_api::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
