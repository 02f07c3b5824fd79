//! Incremental parser for the tag-delimited reasoning span.
//!
//! The model interleaves a `<think>…</think>` reasoning span with its
//! visible answer inside one streamed completion, and either marker can be
//! fragmented across any number of deltas -- down to single characters.
//! The parser therefore never assumes a marker is contained in one delta:
//! it holds back the shortest trailing window that could still become a
//! marker and re-scans it together with the next delta. Everything outside
//! such a window is classified immediately and emitted incrementally.
//!
//! Stray marker text that does not open or close a span is left as literal
//! content, never stripped. User-supplied text is expected to have its
//! markers escaped before it ever reaches the stream (see
//! [`super::escape_markers`]).

use deeptalk_types::error::StructuralError;
use tracing::trace;

use super::{THINK_CLOSE, THINK_OPEN};

/// Parsing phase: outside or inside the reasoning span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Outside,
    Capturing,
}

/// Incremental notification produced while consuming a delta.
///
/// Payloads are the newly appended text; the parser's accessors expose the
/// accumulated buffers for consumers that want snapshots instead.
#[derive(Debug, Clone, PartialEq)]
pub enum SpanEvent {
    /// Literal answer text was appended.
    AnswerDelta(String),
    /// Reasoning text was appended; the span is still open.
    ReasoningDelta(String),
    /// The closing marker was seen; the reasoning buffer is final.
    ReasoningComplete,
}

/// State machine reconstructing the reasoning/answer split of one stream.
///
/// Created when a generation begins and consumed when it ends -- by
/// [`finish`](Self::finish) on normal end-of-stream or
/// [`into_partials`](Self::into_partials) on cancellation.
#[derive(Debug)]
pub struct TagSpanParser {
    phase: Phase,
    answer: String,
    reasoning: String,
    /// Every delta verbatim, for diagnostics only. Never reprocessed.
    raw: String,
    /// Held-back tail that cannot be classified until more input arrives.
    pending: String,
    /// Whether an opening marker has ever opened a span.
    seen_opening: bool,
    /// Set once literal answer text has been emitted; from then on the
    /// opening marker is only honored at the start of a delta (after
    /// leading whitespace), matching the per-delta "begins a block" rule.
    literal_mode: bool,
}

impl Default for TagSpanParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TagSpanParser {
    pub fn new() -> Self {
        Self {
            phase: Phase::Outside,
            answer: String::new(),
            reasoning: String::new(),
            raw: String::new(),
            pending: String::new(),
            seen_opening: false,
            literal_mode: false,
        }
    }

    /// Accumulated visible answer so far.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Accumulated reasoning so far.
    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    /// Raw stream as received, for diagnostics.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whether the parser is currently inside the reasoning span.
    pub fn is_capturing(&self) -> bool {
        self.phase == Phase::Capturing
    }

    /// Consume one decoded delta, in arrival order.
    ///
    /// Returns the incremental notifications this delta produced, or the
    /// structural error that terminates the generation.
    pub fn feed(&mut self, delta: &str) -> Result<Vec<SpanEvent>, StructuralError> {
        self.raw.push_str(delta);

        let mut events = Vec::new();
        let mut buf = std::mem::take(&mut self.pending);
        buf.push_str(delta);

        loop {
            match self.phase {
                Phase::Outside if self.literal_mode => {
                    let trimmed = buf.trim_start();
                    if let Some(rest) = trimmed.strip_prefix(THINK_OPEN) {
                        // A new span opens at the start of this delta; the
                        // whitespace run before the marker is a separator,
                        // not answer text.
                        buf = rest.to_string();
                        self.phase = Phase::Capturing;
                        self.seen_opening = true;
                        continue;
                    }
                    if !self.seen_opening && buf.contains(THINK_CLOSE) {
                        return Err(StructuralError::ErrantClosingTag);
                    }
                    if !buf.is_empty() {
                        self.answer.push_str(&buf);
                        events.push(SpanEvent::AnswerDelta(buf));
                    }
                    return Ok(events);
                }

                Phase::Outside => {
                    // No answer text has been emitted yet; marker detection
                    // here is invariant under arbitrary chunk splits.
                    let open_at = Self::find_block_open(&buf);
                    if let Some(close_at) = buf.find(THINK_CLOSE) {
                        let opens_first = open_at.is_some_and(|j| j < close_at);
                        if !self.seen_opening && !opens_first {
                            return Err(StructuralError::ErrantClosingTag);
                        }
                    }
                    if let Some(j) = open_at {
                        buf.drain(..j + THINK_OPEN.len());
                        self.phase = Phase::Capturing;
                        self.seen_opening = true;
                        continue;
                    }
                    if Self::could_become_block_open(&buf) {
                        self.pending = buf;
                        return Ok(events);
                    }
                    // Definitely literal: emit and switch to per-delta
                    // marker recognition for the rest of the stream.
                    self.literal_mode = true;
                    if !buf.is_empty() {
                        self.answer.push_str(&buf);
                        events.push(SpanEvent::AnswerDelta(buf));
                    }
                    return Ok(events);
                }

                Phase::Capturing => {
                    if let Some(i) = buf.find(THINK_CLOSE) {
                        if i > 0 {
                            let head: String = buf[..i].to_string();
                            self.reasoning.push_str(&head);
                            events.push(SpanEvent::ReasoningDelta(head));
                        }
                        events.push(SpanEvent::ReasoningComplete);
                        self.phase = Phase::Outside;
                        buf.drain(..i + THINK_CLOSE.len());
                        // The suffix after the closing marker is Outside
                        // content; reprocess it in this same call.
                        continue;
                    }
                    let hold = Self::close_prefix_holdback(&buf);
                    let emit_to = buf.len() - hold;
                    if emit_to > 0 {
                        let head: String = buf.drain(..emit_to).collect();
                        self.reasoning.push_str(&head);
                        events.push(SpanEvent::ReasoningDelta(head));
                    }
                    self.pending = buf;
                    return Ok(events);
                }
            }
        }
    }

    /// Terminate on normal end-of-stream.
    ///
    /// An unclosed reasoning span is a structural error that discards the
    /// whole attempt. Otherwise returns the finalized
    /// `(answer, reasoning)` pair; any held-back tail is literal answer
    /// text at this point.
    pub fn finish(mut self) -> Result<(String, String), StructuralError> {
        if self.phase == Phase::Capturing {
            return Err(StructuralError::UnclosedReasoning);
        }
        self.answer.push_str(&self.pending);
        trace!(raw_len = self.raw.len(), "stream complete");
        Ok((self.answer, self.reasoning))
    }

    /// Terminate on cancellation, yielding whatever accumulated.
    pub fn into_partials(mut self) -> (String, String) {
        match self.phase {
            Phase::Outside => self.answer.push_str(&self.pending),
            Phase::Capturing => self.reasoning.push_str(&self.pending),
        }
        (self.answer, self.reasoning)
    }

    /// Position of the first opening marker preceded only by whitespace,
    /// if any.
    fn find_block_open(buf: &str) -> Option<usize> {
        buf.find(THINK_OPEN)
            .filter(|&j| buf[..j].chars().all(char::is_whitespace))
    }

    /// Whether the whole buffer could still grow into `ws* + marker`.
    fn could_become_block_open(buf: &str) -> bool {
        let rest = buf.trim_start();
        if rest.is_empty() {
            return true;
        }
        (rest.len() < THINK_OPEN.len() && THINK_OPEN.starts_with(rest))
            || (rest.len() < THINK_CLOSE.len() && THINK_CLOSE.starts_with(rest))
    }

    /// Length of the longest proper prefix of the closing marker that ends
    /// the buffer.
    fn close_prefix_holdback(buf: &str) -> usize {
        let bytes = buf.as_bytes();
        (1..THINK_CLOSE.len())
            .rev()
            .find(|&n| n <= bytes.len() && bytes.ends_with(&THINK_CLOSE.as_bytes()[..n]))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run a sequence of deltas through a fresh parser and finish it.
    fn run(deltas: &[&str]) -> Result<(String, String), StructuralError> {
        let mut parser = TagSpanParser::new();
        for delta in deltas {
            parser.feed(delta)?;
        }
        parser.finish()
    }

    #[test]
    fn test_single_chunk_well_formed() {
        let (answer, reasoning) = run(&["<think>deep thought</think>The answer."]).unwrap();
        assert_eq!(reasoning, "deep thought");
        assert_eq!(answer, "The answer.");
    }

    #[test]
    fn test_chunk_boundary_invariance_all_two_and_three_part_splits() {
        let stream = "<think>deep thought</think>The answer.";
        for i in 1..stream.len() {
            let (a, b) = stream.split_at(i);
            let (answer, reasoning) = run(&[a, b]).unwrap();
            assert_eq!(reasoning, "deep thought", "2-split at {i}");
            assert_eq!(answer, "The answer.", "2-split at {i}");

            for j in i..stream.len() {
                let (b1, b2) = stream[i..].split_at(j - i);
                let (answer, reasoning) = run(&[a, b1, b2]).unwrap();
                assert_eq!(reasoning, "deep thought", "3-split at {i},{j}");
                assert_eq!(answer, "The answer.", "3-split at {i},{j}");
            }
        }
    }

    #[test]
    fn test_chunk_boundary_invariance_char_at_a_time() {
        let stream = " \n<think>a<b>c</d</think>  tail";
        let deltas: Vec<String> = stream.chars().map(String::from).collect();
        let refs: Vec<&str> = deltas.iter().map(String::as_str).collect();
        let (answer, reasoning) = run(&refs).unwrap();
        assert_eq!(reasoning, "a<b>c</d");
        assert_eq!(answer, "  tail");
    }

    #[test]
    fn test_untagged_stream_is_all_answer() {
        let (answer, reasoning) = run(&["answer text,", " no tags"]).unwrap();
        assert_eq!(answer, "answer text, no tags");
        assert_eq!(reasoning, "");
    }

    #[test]
    fn test_unclosed_span_is_malformed() {
        let err = run(&["<think>still thinking"]).unwrap_err();
        assert_eq!(err, StructuralError::UnclosedReasoning);
    }

    #[test]
    fn test_errant_closing_tag_is_malformed() {
        let err = run(&["</think>oops"]).unwrap_err();
        assert_eq!(err, StructuralError::ErrantClosingTag);
    }

    #[test]
    fn test_errant_closing_tag_split_across_deltas() {
        let mut parser = TagSpanParser::new();
        parser.feed("</th").unwrap();
        let err = parser.feed("ink>").unwrap_err();
        assert_eq!(err, StructuralError::ErrantClosingTag);
    }

    #[test]
    fn test_closing_tag_after_completed_span_is_literal() {
        let (answer, reasoning) = run(&["<think>r</think>a", "</think>b"]).unwrap();
        assert_eq!(reasoning, "r");
        assert_eq!(answer, "a</think>b");
    }

    #[test]
    fn test_stray_opening_tag_mid_delta_is_literal() {
        let (answer, reasoning) = run(&["see the <think> tag"]).unwrap();
        assert_eq!(answer, "see the <think> tag");
        assert_eq!(reasoning, "");
    }

    #[test]
    fn test_delta_beginning_with_opening_tag_opens_mid_stream() {
        let (answer, reasoning) = run(&["partial answer ", "<think>more</think> rest"]).unwrap();
        assert_eq!(reasoning, "more");
        assert_eq!(answer, "partial answer  rest");
    }

    #[test]
    fn test_leading_whitespace_before_opening_tag_is_dropped() {
        let (answer, reasoning) = run(&["  \n<think>r</think>a"]).unwrap();
        assert_eq!(reasoning, "r");
        assert_eq!(answer, "a");
    }

    #[test]
    fn test_nested_opening_marker_is_literal_reasoning() {
        let (answer, reasoning) = run(&["<think>a<think>b</think>c"]).unwrap();
        assert_eq!(reasoning, "a<think>b");
        assert_eq!(answer, "c");
    }

    #[test]
    fn test_marker_lookalikes_stay_literal() {
        let (answer, reasoning) = run(&["<thinker>no</thinker>"]).unwrap();
        assert_eq!(reasoning, "");
        assert_eq!(answer, "<thinker>no</thinker>");
    }

    #[test]
    fn test_false_close_prefix_inside_reasoning_is_kept() {
        let (answer, reasoning) = run(&["<think>a</thin", "k stuff</think>done"]).unwrap();
        assert_eq!(reasoning, "a</think stuff");
        assert_eq!(answer, "done");
    }

    #[test]
    fn test_incremental_events_are_emitted() {
        let mut parser = TagSpanParser::new();
        let events = parser.feed("<think>abc").unwrap();
        assert!(events
            .iter()
            .any(|e| matches!(e, SpanEvent::ReasoningDelta(t) if t == "abc")));

        let events = parser.feed("</think>xyz").unwrap();
        assert!(events.contains(&SpanEvent::ReasoningComplete));
        assert!(events
            .iter()
            .any(|e| matches!(e, SpanEvent::AnswerDelta(t) if t == "xyz")));
    }

    #[test]
    fn test_partials_after_cancellation_mid_capture() {
        let mut parser = TagSpanParser::new();
        parser.feed("<think>partial reas").unwrap();
        let (answer, reasoning) = parser.into_partials();
        assert_eq!(answer, "");
        assert_eq!(reasoning, "partial reas");
    }

    #[test]
    fn test_finish_flushes_held_back_tail_as_answer() {
        // A tail that looks like a marker prefix but never completes is
        // literal once the stream ends.
        let (answer, reasoning) = run(&["<think>r</think>ans</th"]).unwrap();
        assert_eq!(reasoning, "r");
        assert_eq!(answer, "ans</th");
    }

    #[test]
    fn test_whitespace_only_stream() {
        let (answer, reasoning) = run(&["  ", "\n"]).unwrap();
        assert_eq!(answer, "  \n");
        assert_eq!(reasoning, "");
    }

    #[test]
    fn test_raw_buffer_accumulates_verbatim() {
        let mut parser = TagSpanParser::new();
        parser.feed("<think>a").unwrap();
        parser.feed("</think>b").unwrap();
        assert_eq!(parser.raw(), "<think>a</think>b");
    }
}
