//! Command line argument parsing
//!
//! Subcommands:
//! - `run`: Start the session core and its heartbeat against the core server
//! - `show-config`: Show the effective configuration and discovery hierarchy

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "bastion-sessions")]
#[command(author = "Bastion Sessions Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Session registry and lifecycle core for a multi-protocol bastion proxy")]
#[command(long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Args {
    /// Configuration file path (skips discovery)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the session core until interrupted
    Run {
        /// Core API server URL, overrides the configuration
        #[arg(long = "core-host", value_name = "URL")]
        core_host: Option<String>,
        /// Heartbeat interval in seconds, overrides the configuration
        #[arg(long = "heartbeat-interval", value_name = "SECS")]
        heartbeat_interval: Option<u64>,
    },
    /// Show configuration discovery information
    ShowConfig,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}
