//! Command line definitions.
//!
//! Commands:
//! - noteshelf [serve]
//! - noteshelf ping

use clap::{Parser, Subcommand};

/// noteshelf - a minimal note listing service
#[derive(Parser, Debug)]
#[command(name = "noteshelf")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Serve HTTP using settings from the environment (default)
    Serve,
    /// Print core linkage info and exit
    Ping,
}

impl Cli {
    /// Selected command; `serve` when none is given.
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }
}
