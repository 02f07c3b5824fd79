//! Terminal implementation of the core `RenderSink` seam.
//!
//! The controller hands this sink accumulated snapshots; the sink prints
//! only the unseen suffix of each, so streaming output appears token by
//! token. The reasoning block is rendered dim and gets a visible header
//! when it opens and a marker when it completes.

use console::style;
use indicatif::ProgressBar;

use deeptalk_core::transport::RenderSink;

use super::renderer::ChatRenderer;

/// Streams generation updates to the terminal.
pub struct TerminalSink<'a> {
    renderer: &'a ChatRenderer,
    spinner: Option<ProgressBar>,
    printed_answer: usize,
    printed_reasoning: usize,
    reasoning_open: bool,
}

impl<'a> TerminalSink<'a> {
    pub fn new(renderer: &'a ChatRenderer, spinner: ProgressBar) -> Self {
        Self {
            renderer,
            spinner: Some(spinner),
            printed_answer: 0,
            printed_reasoning: 0,
            reasoning_open: false,
        }
    }

    /// Clear the spinner if no output ever arrived.
    pub fn finish(&mut self) {
        self.clear_spinner();
    }

    fn clear_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl RenderSink for TerminalSink<'_> {
    fn on_answer_update(&mut self, text: &str) {
        self.clear_spinner();
        if self.reasoning_open {
            // The reasoning block never completed a line of its own.
            println!();
            self.reasoning_open = false;
        }
        self.renderer
            .print_streaming_token(&text[self.printed_answer..]);
        self.printed_answer = text.len();
    }

    fn on_reasoning_update(&mut self, text: &str, is_final: bool) {
        self.clear_spinner();
        if !self.reasoning_open && !is_final {
            println!("\n  {}", style("\u{1f50d} CoT reasoning:").dim().bold());
            self.reasoning_open = true;
        }
        self.renderer
            .print_reasoning_token(&text[self.printed_reasoning..]);
        self.printed_reasoning = text.len();

        if is_final {
            println!("\n  {}", style("\u{1f50d} CoT complete").dim());
            self.reasoning_open = false;
        }
    }

    fn on_error(&mut self, reason: &str) {
        self.clear_spinner();
        if self.reasoning_open {
            println!();
            self.reasoning_open = false;
        }
        eprintln!("\n  {} {}", style("!").red().bold(), style(reason).red());
    }
}
