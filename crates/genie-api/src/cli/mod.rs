//! CLI definitions for the `genie-bot` binary.
//!
//! With no subcommand the binary serves the Bot Framework endpoint.

pub mod ask;

use clap::{Parser, Subcommand};

/// Chat with a Databricks Genie space from Teams, the Bot Framework
/// emulator, or the terminal.
#[derive(Parser)]
#[command(name = "genie-bot", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log one JSON object per line.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Default filter directives for the chosen verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "info",
            1 => "info,genie_core=debug,genie_infra=debug,genie_bot=debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the Bot Framework endpoint (the default).
    Serve {
        /// Address to bind (overrides HOST).
        #[arg(long, env = "HOST")]
        host: Option<String>,

        /// Port to bind (overrides PORT).
        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },

    /// Ask Genie a single question and print the markdown answer.
    Ask {
        /// The question to send.
        question: String,

        /// User id the turn is attributed to.
        #[arg(long, default_value = "cli")]
        user: String,

        /// Print raw markdown instead of rendering it.
        #[arg(long)]
        raw: bool,
    },
}
