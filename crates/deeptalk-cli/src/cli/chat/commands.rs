//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and provide the in-chat history controls:
//! regenerate, remove, clear, export, and session management.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Regenerate the last answer.
    Regen,
    /// Remove the last user+assistant exchange.
    Remove,
    /// Clear the whole conversation (asks for confirmation).
    Clear,
    /// Export the transcript, optionally to a named file.
    Export(Option<String>),
    /// Show the stored conversation, reasoning included.
    History,
    /// Exit the chat session.
    Exit,
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let mut parts = trimmed.splitn(2, ' ');
    let cmd = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next().map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/regen" | "/regenerate" => Some(ChatCommand::Regen),
        "/remove" | "/rm" => Some(ChatCommand::Remove),
        "/clear" => Some(ChatCommand::Clear),
        "/export" | "/save" => Some(ChatCommand::Export(arg)),
        "/history" => Some(ChatCommand::History),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}     {}", style("/help").cyan(), "Show this help message");
    println!("  {}    {}", style("/regen").cyan(), "Regenerate the last answer");
    println!("  {}   {}", style("/remove").cyan(), "Remove the last exchange");
    println!("  {}    {}", style("/clear").cyan(), "Clear the conversation");
    println!("  {}   {}", style("/export").cyan(), "Export the transcript [filename]");
    println!("  {}  {}", style("/history").cyan(), "Show the conversation with reasoning");
    println!("  {}     {}", style("/exit").cyan(), "End the chat session");
    println!();
    println!(
        "  {}",
        style("Ctrl+C stops a running generation, Ctrl+D exits").dim()
    );
    println!();
}
