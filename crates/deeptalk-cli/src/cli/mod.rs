//! CLI command definitions and dispatch for the `deeptalk` binary.
//!
//! Uses clap derive macros for argument parsing. Running with no
//! subcommand starts a chat session.

pub mod chat;
pub mod config;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Chat with reasoning LLMs without resending their chain of thought.
#[derive(Parser)]
#[command(name = "deeptalk", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session (the default).
    Chat {
        /// Override the configured endpoint URL for this session.
        #[arg(long)]
        endpoint: Option<String>,

        /// Override the configured model for this session.
        #[arg(long)]
        model: Option<String>,
    },

    /// Inspect or edit the configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the current configuration.
    Show,

    /// Set one configuration value (e.g. `config set temperature 0.8`).
    Set {
        /// Field name as it appears in config.toml.
        key: String,
        /// New value. An empty string clears `api_key`.
        value: String,
    },

    /// Reset the configuration file to defaults.
    Reset,
}
