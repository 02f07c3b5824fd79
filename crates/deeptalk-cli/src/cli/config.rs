//! Handlers for the `deeptalk config` subcommands.

use console::style;

use deeptalk_infra::config::{config_path, load, save, set_value};
use deeptalk_types::config::SessionConfig;

use super::ConfigCommand;

pub fn run(action: ConfigCommand) -> anyhow::Result<()> {
    match action {
        ConfigCommand::Show => show(),
        ConfigCommand::Set { key, value } => set(&key, &value),
        ConfigCommand::Reset => reset(),
    }
}

fn show() -> anyhow::Result<()> {
    let config = load()?;
    let path = config_path()?;

    println!();
    println!("  {} {}", style("Config:").bold(), style(path.display()).dim());
    println!();
    println!("  api_endpoint   {}", config.api_endpoint);
    println!("  model          {}", config.model);
    println!("  temperature    {}", config.temperature);
    println!("  top_p          {}", config.top_p);
    println!("  max_context    {} bytes", config.max_context);
    // Never echo the credential itself.
    println!(
        "  api_key        {}",
        if config.api_key.is_some() {
            "(set)"
        } else {
            "(not set)"
        }
    );
    println!("  debug          {}", config.debug);
    println!("  prepend_think  {}", config.prepend_think);
    println!();
    Ok(())
}

fn set(key: &str, value: &str) -> anyhow::Result<()> {
    let mut config = load()?;
    set_value(&mut config, key, value)?;
    save(&config)?;
    if key == "api_key" {
        println!("  {} {key} updated", style("*").cyan().bold());
    } else {
        println!("  {} {key} = {value}", style("*").cyan().bold());
    }
    Ok(())
}

fn reset() -> anyhow::Result<()> {
    save(&SessionConfig::default())?;
    println!(
        "  {} configuration reset to defaults",
        style("*").cyan().bold()
    );
    Ok(())
}
