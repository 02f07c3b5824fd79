//! Frame decoder for the chunked completion stream.
//!
//! The transport yields opaque byte frames (one SSE line per frame). This
//! module reduces each frame to at most one text delta, filtering protocol
//! noise: keep-alive comments, empty lines, the `[DONE]` sentinel, and
//! frames that fail to decode or parse. Nothing here is ever fatal -- a
//! bad frame degrades to an empty delta and the stream continues.

use serde::Deserialize;
use tracing::debug;

/// One parsed chunk of an OpenAI-compatible streaming response.
#[derive(Debug, Deserialize)]
struct CompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Extract the incremental content delta from one transport frame.
///
/// Returns `None` for anything that carries no usable content. When
/// `debug` is set, discarded frames are logged with the reason.
pub fn decode_frame(frame: &[u8], debug: bool) -> Option<String> {
    let text = match std::str::from_utf8(frame) {
        Ok(t) => t.trim(),
        Err(e) => {
            if debug {
                debug!(error = %e, "discarding frame with invalid encoding");
            }
            return None;
        }
    };

    // Blank keep-alive lines and SSE comments (": ping ...") carry nothing.
    if text.is_empty() || text.starts_with(':') {
        return None;
    }

    let data = match text.strip_prefix("data:") {
        Some(rest) => rest.trim(),
        None => text,
    };
    if data.is_empty() || data == "[DONE]" {
        return None;
    }

    let chunk: CompletionChunk = match serde_json::from_str(data) {
        Ok(c) => c,
        Err(e) => {
            if debug {
                debug!(error = %e, "discarding unparseable frame");
            }
            return None;
        }
    };

    chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|content| !content.is_empty())
}
