//! CLI argument definitions using clap
//!
//! Commands:
//! - pulse_api serve [--config <path>] [--port <port>] [--host <host>]
//! - pulse_api check-config --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Demo REST + realtime backend over in-memory resources
#[derive(Parser, Debug)]
#[command(name = "pulse_api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP and WebSocket server
    Serve {
        /// Path to configuration file (built-in defaults when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port override
        #[arg(long, env = "PORT")]
        port: Option<u16>,

        /// Host override
        #[arg(long)]
        host: Option<String>,
    },

    /// Validate a configuration file and print the resolved settings
    CheckConfig {
        /// Path to configuration file
        #[arg(long)]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
