//! Seams to the external collaborators: transport and rendering surface.

use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

use deeptalk_types::error::TransportError;
use deeptalk_types::llm::CompletionRequest;

/// The streaming transport collaborator.
///
/// `send` performs the HTTP request and yields the response body as a
/// sequence of raw frames (one SSE line per frame). Frames are opaque here;
/// decoding them is [`crate::stream::decode`]'s job, so transports stay a
/// thin I/O shim. Returns a boxed stream because streams need to be
/// object-safe for callers that hold a `dyn ChatTransport`.
pub trait ChatTransport: Send + Sync {
    fn send(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send + 'static>>;
}

/// The rendering surface collaborator.
///
/// Callbacks are fire-and-forget with no backpressure contract: the
/// generation loop never blocks on the renderer. `text` arguments are
/// accumulated snapshots, so a renderer can redraw a growing block or
/// diff against what it already printed.
pub trait RenderSink {
    /// The visible answer grew; `text` is the full answer so far.
    fn on_answer_update(&mut self, text: &str);

    /// The reasoning trace grew or was finalized; `text` is the full
    /// trace so far.
    fn on_reasoning_update(&mut self, text: &str, is_final: bool);

    /// The generation terminated with an error; `reason` is the stable
    /// user-facing description.
    fn on_error(&mut self, reason: &str);
}
