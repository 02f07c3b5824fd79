//! DeepTalk CLI entry point.
//!
//! Binary name: `deeptalk`
//!
//! Parses CLI arguments, initializes tracing, loads the session
//! configuration, and dispatches to the chat loop or a config command.

mod cli;

use clap::Parser;
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,deeptalk=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // With no subcommand, drop straight into a chat session.
    let command = cli.command.unwrap_or(Commands::Chat {
        endpoint: None,
        model: None,
    });

    match command {
        Commands::Chat { endpoint, model } => {
            let mut config = deeptalk_infra::config::load()?;
            if let Some(endpoint) = endpoint {
                config.api_endpoint = endpoint;
            }
            if let Some(model) = model {
                config.model = model;
            }
            cli::chat::run_chat_loop(config).await?;
        }

        Commands::Config { action } => {
            cli::config::run(action)?;
        }

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(shell, &mut cmd, "deeptalk", &mut std::io::stdout());
        }
    }

    Ok(())
}
