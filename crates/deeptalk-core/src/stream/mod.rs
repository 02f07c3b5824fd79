//! Incremental processing of the chunked completion stream.
//!
//! [`decode`] turns one raw transport frame into at most one text delta;
//! [`parser`] consumes the delta sequence and reconstructs the
//! tag-delimited reasoning/answer split.

pub mod decode;
pub mod parser;

/// Opening marker of the reasoning span.
pub const THINK_OPEN: &str = "<think>";

/// Closing marker of the reasoning span.
pub const THINK_CLOSE: &str = "</think>";

/// Replace literal reasoning markers in user-supplied text with an inert
/// representation.
///
/// Applied before a user turn is stored, so the text can never be
/// misinterpreted as a span delimiter when the turn is resent on a later
/// request.
pub fn escape_markers(text: &str) -> String {
    text.replace(THINK_OPEN, "&lt;think&gt;")
        .replace(THINK_CLOSE, "&lt;/think&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markers_neutralizes_both_tags() {
        let escaped = escape_markers("a <think>b</think> c");
        assert_eq!(escaped, "a &lt;think&gt;b&lt;/think&gt; c");
        assert!(!escaped.contains(THINK_OPEN));
        assert!(!escaped.contains(THINK_CLOSE));
    }

    #[test]
    fn test_escape_markers_leaves_plain_text_alone() {
        assert_eq!(escape_markers("no tags here <b>"), "no tags here <b>");
    }
}
