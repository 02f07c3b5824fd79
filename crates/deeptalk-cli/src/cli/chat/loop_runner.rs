//! Main chat loop orchestration.
//!
//! Owns the session controller for the lifetime of one chat session and
//! drives it from terminal input: user messages trigger generations,
//! slash commands map to the history operations, Ctrl+C cancels an
//! in-flight generation. Generations are awaited inline, so no history
//! mutation can race one -- the pending flag is only ever observed false
//! here.

use std::time::Instant;

use chrono::Local;
use console::style;
use secrecy::SecretString;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

use deeptalk_core::session::{GenerationOutcome, SessionController};
use deeptalk_core::transport::ChatTransport;
use deeptalk_infra::http::HttpChatTransport;
use deeptalk_types::config::SessionConfig;
use deeptalk_types::turn::Turn;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;
use super::sink::TerminalSink;

/// Default export filename when `/export` is given none.
const DEFAULT_EXPORT_FILE: &str = "chat_log.txt";

/// Run the interactive chat loop until the user exits.
pub async fn run_chat_loop(config: SessionConfig) -> anyhow::Result<()> {
    let api_key = config.api_key.clone().map(SecretString::from);
    let transport = HttpChatTransport::new(&config.api_endpoint, api_key)?;

    let session_id = Uuid::now_v7().to_string();
    print_welcome_banner(&config.api_endpoint, &config.model, &session_id);
    info!(session = %session_id, model = %config.model, "chat session started");

    let renderer = ChatRenderer::new();
    let mut controller = SessionController::new(config);

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("failed to initialize input: {e}"))?;

    loop {
        match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Message(text) => {
                if text.is_empty() {
                    continue;
                }

                if let Some(cmd) = commands::parse(&text) {
                    match cmd {
                        ChatCommand::Help => commands::print_help(),
                        ChatCommand::Exit => {
                            println!("\n  {}", style("Session ended.").dim());
                            break;
                        }
                        ChatCommand::Clear => clear_with_confirmation(&mut controller),
                        ChatCommand::History => print_history(&controller, &renderer),
                        ChatCommand::Export(path) => export_transcript(&controller, path.as_deref()),
                        ChatCommand::Remove => remove_last(&mut controller),
                        ChatCommand::Regen => {
                            if controller.regenerate() {
                                generate(&mut controller, &transport, &renderer).await;
                            } else {
                                println!(
                                    "\n  {} Nothing to regenerate.",
                                    style("!").yellow().bold()
                                );
                            }
                        }
                        ChatCommand::Unknown(name) => {
                            println!(
                                "\n  {} Unknown command: {}. Type /help for available commands.",
                                style("?").yellow().bold(),
                                style(name).dim()
                            );
                        }
                    }
                    continue;
                }

                controller.submit(&text);
                generate(&mut controller, &transport, &renderer).await;
            }
        }
    }

    Ok(())
}

/// Run one generation to its terminal outcome, wiring Ctrl+C to the
/// cooperative cancellation token.
async fn generate<T: ChatTransport>(
    controller: &mut SessionController,
    transport: &T,
    renderer: &ChatRenderer,
) {
    let cancel = CancellationToken::new();
    let ctrl_c = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_style(
        indicatif::ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .expect("static spinner template"),
    );
    spinner.set_message("thinking... (Ctrl+C to stop)");
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));

    let started = Instant::now();
    let model = controller.config().model.clone();
    let mut sink = TerminalSink::new(renderer, spinner);
    let outcome = controller.run_generation(transport, &mut sink, &cancel).await;
    sink.finish();
    ctrl_c.abort();

    match outcome {
        GenerationOutcome::Completed { .. } => {
            renderer.print_stats_footer(started.elapsed().as_millis() as u64, &model);
            println!();
        }
        GenerationOutcome::Cancelled => {
            println!("\n  {}", style("Generation stopped.").dim());
            println!();
        }
        GenerationOutcome::Malformed(_) | GenerationOutcome::TransportFailed(_) => {
            // The sink already printed the reason.
            println!(
                "  {}",
                style("Your message is kept -- edit it or send again to retry.").dim()
            );
            println!();
        }
    }
}

fn clear_with_confirmation(controller: &mut SessionController) {
    if controller.store().is_empty() {
        println!("\n  {} History is already empty.", style("!").yellow().bold());
        return;
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt("Clear the whole conversation?")
        .default(false)
        .interact()
        .unwrap_or(false);
    if confirmed {
        controller.clear();
        println!("\n  {} Conversation cleared.", style("*").cyan().bold());
    } else {
        println!("\n  {}", style("Kept the conversation.").dim());
    }
}

fn remove_last(controller: &mut SessionController) {
    let removed = controller.remove_last();
    if removed.is_empty() {
        println!("\n  {} History is already empty.", style("!").yellow().bold());
    } else {
        println!(
            "\n  {} Removed {} turn(s).",
            style("*").cyan().bold(),
            removed.len()
        );
    }
}

fn print_history(controller: &SessionController, renderer: &ChatRenderer) {
    if controller.store().is_empty() {
        println!("\n  {}", style("No conversation yet.").dim());
        return;
    }
    println!();
    for turn in controller.store().turns() {
        match turn {
            Turn::User { visible } => {
                println!("  {} {visible}", style("You >").green().bold());
            }
            Turn::Assistant { visible, reasoning } => {
                if let Some(reasoning) = reasoning {
                    println!("  {}", style("\u{1f50d} CoT:").dim().bold());
                    for line in reasoning.lines() {
                        println!("  {}", style(line).dim());
                    }
                }
                let rendered = renderer.render_markdown(visible);
                println!("  {}", rendered.trim_end());
            }
        }
        println!();
    }
}

fn export_transcript(controller: &SessionController, path: Option<&str>) {
    let path = path.unwrap_or(DEFAULT_EXPORT_FILE);

    if std::path::Path::new(path).exists() {
        let overwrite = dialoguer::Confirm::new()
            .with_prompt(format!("'{path}' exists, overwrite?"))
            .default(false)
            .interact()
            .unwrap_or(false);
        if !overwrite {
            println!("\n  {}", style("Export cancelled.").dim());
            return;
        }
    }

    let transcript = controller.transcript(Local::now());
    match std::fs::write(path, transcript) {
        Ok(()) => println!(
            "\n  {} Log exported as {}",
            style("*").cyan().bold(),
            style(path).bold()
        ),
        Err(e) => println!(
            "\n  {} Failed to export log: {e}",
            style("!").red().bold()
        ),
    }
}
