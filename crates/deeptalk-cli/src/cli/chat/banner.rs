//! Welcome banner for chat sessions.

use console::style;

/// Print the styled banner at the start of a chat session.
pub fn print_welcome_banner(endpoint: &str, model: &str, session_id: &str) {
    println!();
    println!("  {} {}", "\u{1f9e0}", style("DeepTalk").cyan().bold());
    println!(
        "  {}",
        style("Reasoning is shown live and archived, but never resent to the model.").dim()
    );
    println!();
    println!("  {}  {}", style("Endpoint:").bold(), style(endpoint).dim());
    println!("  {}     {}", style("Model:").bold(), style(model).dim());
    println!(
        "  {}   {}",
        style("Session:").bold(),
        style(&session_id[..8.min(session_id.len())]).dim()
    );
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
