//! Terminal rendering for chat output.
//!
//! While a response streams, tokens are printed raw (answer) or dimmed
//! (reasoning) so the user sees progress immediately. Stored answers are
//! re-rendered as markdown via `termimad`, with fenced code blocks
//! highlighted through `syntect`.

use std::io::Write;

use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use termimad::MadSkin;

/// Highlight theme for code blocks.
const CODE_THEME: &str = "base16-ocean.dark";

/// Terminal markdown renderer with syntax-highlighted code blocks.
pub struct ChatRenderer {
    skin: MadSkin,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.inline_code
            .set_fg(termimad::crossterm::style::Color::Yellow);
        skin.bold.set_fg(termimad::crossterm::style::Color::Cyan);

        Self {
            skin,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Print a single streaming answer token, raw.
    pub fn print_streaming_token(&self, token: &str) {
        print!("{token}");
        let _ = std::io::stdout().flush();
    }

    /// Print a single streaming reasoning token, dimmed.
    pub fn print_reasoning_token(&self, token: &str) {
        print!("{}", console::style(token).dim());
        let _ = std::io::stdout().flush();
    }

    /// Render a stored markdown answer.
    ///
    /// Fenced code blocks go through syntect; prose goes through the
    /// termimad skin.
    pub fn render_markdown(&self, markdown: &str) -> String {
        let mut output = String::new();
        let mut code_block: Option<(String, String)> = None; // (lang, buffer)

        for line in markdown.lines() {
            let is_fence = line.starts_with("```");
            match code_block.take() {
                None if is_fence => {
                    let lang = line.trim_start_matches('`').trim().to_string();
                    code_block = Some((lang, String::new()));
                }
                Some((lang, buffer)) if is_fence => {
                    output.push_str(&self.highlight_code(&buffer, &lang));
                }
                Some((lang, mut buffer)) => {
                    buffer.push_str(line);
                    buffer.push('\n');
                    code_block = Some((lang, buffer));
                }
                None => {
                    let rendered = self.skin.term_text(line);
                    output.push_str(&format!("{rendered}"));
                }
            }
        }

        // An unclosed fence still renders what accumulated.
        if let Some((lang, buffer)) = code_block {
            if !buffer.is_empty() {
                output.push_str(&self.highlight_code(&buffer, &lang));
            }
        }

        output
    }

    /// Print the footer after a completed response.
    pub fn print_stats_footer(&self, response_ms: u64, model: &str) {
        let seconds = response_ms as f64 / 1000.0;
        println!(
            "\n  {} {:.1}s {} {}",
            console::style("|").dim(),
            console::style(seconds).dim(),
            console::style("\u{00b7}").dim(),
            console::style(model).dim(),
        );
    }

    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = if lang.is_empty() {
            self.syntax_set.find_syntax_plain_text()
        } else {
            self.syntax_set
                .find_syntax_by_token(lang)
                .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
        };

        let theme = &self.theme_set.themes[CODE_THEME];
        let mut highlighter = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        for line in code.lines() {
            let ranges: Vec<(Style, &str)> = highlighter
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_default();
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            output.push_str(&format!("  {escaped}\x1b[0m\n"));
        }
        output
    }
}
