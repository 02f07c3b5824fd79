//! Plain-text transcript export.
//!
//! Unlike transmission, export shows everything that is stored: the full
//! reasoning trace appears next to each answer. The format is a timestamp
//! header followed by labeled `User:` / `CoT:` / `Answer:` blocks with a
//! fixed delimiter line between exchanges.

use chrono::{DateTime, Local};
use deeptalk_types::turn::Turn;

use super::store::TurnStore;

/// Delimiter line between exchange blocks.
const BLOCK_DELIMITER: &str = "---";

/// Placeholder for an empty reasoning or answer section.
const EMPTY_SECTION: &str = "None";

/// Render the whole store as a plain-text transcript.
///
/// The timestamp is passed in by the caller so exports are reproducible
/// under test.
pub fn render_transcript(store: &TurnStore, exported_at: DateTime<Local>) -> String {
    let mut out = format!(
        "Log exported on {}\n",
        exported_at.format("%Y-%m-%d %H:%M:%S")
    );

    let turns = store.turns();
    let mut i = 0;
    while i < turns.len() {
        let (user, assistant) = match &turns[i] {
            Turn::User { visible } => {
                let assistant = turns.get(i + 1).filter(|t| t.is_assistant());
                i += if assistant.is_some() { 2 } else { 1 };
                (Some(visible.as_str()), assistant)
            }
            // An assistant turn without a preceding user turn cannot be
            // produced by the session controller, but export renders
            // whatever is stored.
            assistant @ Turn::Assistant { .. } => {
                i += 1;
                (None, Some(assistant))
            }
        };

        out.push('\n');
        out.push_str(BLOCK_DELIMITER);
        out.push_str("\n\nUser:\n");
        out.push_str(section(user));
        out.push_str("\n\nCoT:\n");
        out.push_str(section(assistant.and_then(|t| t.reasoning())));
        out.push_str("\n\nAnswer:\n");
        out.push_str(section(assistant.map(|t| t.visible())));
        out.push('\n');
    }

    out
}

fn section(text: Option<&str>) -> &str {
    match text.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => EMPTY_SECTION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 8, 8, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_header_carries_timestamp() {
        let transcript = render_transcript(&TurnStore::new(), fixed_time());
        assert!(transcript.starts_with("Log exported on 2026-08-08 12:30:00\n"));
    }

    #[test]
    fn test_full_exchange_renders_all_sections() {
        let mut store = TurnStore::new();
        store.push_user("why is the sky blue?");
        store.push_assistant("Rayleigh scattering.", Some("light scatters".to_string()));

        let transcript = render_transcript(&store, fixed_time());
        assert!(transcript.contains("User:\nwhy is the sky blue?"));
        assert!(transcript.contains("CoT:\nlight scatters"));
        assert!(transcript.contains("Answer:\nRayleigh scattering."));
        assert!(transcript.contains(BLOCK_DELIMITER));
    }

    #[test]
    fn test_export_includes_reasoning_that_transmission_redacts() {
        let mut store = TurnStore::new();
        store.push_user("q");
        store.push_assistant("a", Some("hidden chain of thought".to_string()));

        let transcript = render_transcript(&store, fixed_time());
        assert!(transcript.contains("hidden chain of thought"));
    }

    #[test]
    fn test_missing_reasoning_renders_none() {
        let mut store = TurnStore::new();
        store.push_user("q");
        store.push_assistant("a", None);

        let transcript = render_transcript(&store, fixed_time());
        assert!(transcript.contains("CoT:\nNone"));
    }

    #[test]
    fn test_dangling_user_turn_renders_empty_sections() {
        let mut store = TurnStore::new();
        store.push_user("still waiting");

        let transcript = render_transcript(&store, fixed_time());
        assert!(transcript.contains("User:\nstill waiting"));
        assert!(transcript.contains("CoT:\nNone"));
        assert!(transcript.contains("Answer:\nNone"));
    }

    #[test]
    fn test_blocks_are_separated_by_delimiter() {
        let mut store = TurnStore::new();
        store.push_user("q1");
        store.push_assistant("a1", None);
        store.push_user("q2");
        store.push_assistant("a2", None);

        let transcript = render_transcript(&store, fixed_time());
        assert_eq!(transcript.matches(BLOCK_DELIMITER).count(), 2);
    }
}
