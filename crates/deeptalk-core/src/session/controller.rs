//! Session controller: orchestrates one conversation.
//!
//! The controller exclusively owns the turn store and the in-flight parser
//! state for the duration of a generation; a single logical generation is
//! in flight at a time, gated by the pending flag. Callers must disable
//! history-mutating affordances while [`is_pending`](SessionController::is_pending)
//! is true.

use chrono::{DateTime, Local};
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use deeptalk_types::config::SessionConfig;
use deeptalk_types::error::{StructuralError, TransportError};
use deeptalk_types::llm::{CompletionRequest, Message, MessageRole};
use deeptalk_types::turn::Turn;

use crate::history::assembler::assemble;
use crate::history::export::render_transcript;
use crate::history::store::TurnStore;
use crate::stream::decode::decode_frame;
use crate::stream::escape_markers;
use crate::stream::parser::{SpanEvent, TagSpanParser};
use crate::transport::{ChatTransport, RenderSink};

/// Terminal outcome of one generation attempt.
#[derive(Debug)]
pub enum GenerationOutcome {
    /// The stream ended cleanly; the assistant turn was committed.
    Completed {
        answer: String,
        reasoning: Option<String>,
    },
    /// Cancellation was requested; partial content was discarded and the
    /// store rolled back to its pre-attempt state.
    Cancelled,
    /// The stream was structurally malformed; nothing was committed and
    /// the user turn is retained for a retry.
    Malformed(StructuralError),
    /// The transport failed; nothing was committed and the user turn is
    /// retained for a retry.
    TransportFailed(TransportError),
}

/// Drives one conversation session.
pub struct SessionController {
    store: TurnStore,
    config: SessionConfig,
    pending_generation: bool,
    /// One-slot copy of the assistant turn removed by a regeneration,
    /// held until the next Completed/Malformed outcome so a cancelled
    /// regeneration restores the previous answer.
    rollback: Option<Turn>,
}

impl SessionController {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            store: TurnStore::new(),
            config,
            pending_generation: false,
            rollback: None,
        }
    }

    pub fn store(&self) -> &TurnStore {
        &self.store
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Whether a generation is in flight. History-mutating operations
    /// must not be invoked while this is set.
    pub fn is_pending(&self) -> bool {
        self.pending_generation
    }

    /// Accept user input: escape any literal reasoning markers so the
    /// text can never be misread as a delimiter on a later resend, store
    /// the turn, and mark a generation pending.
    pub fn submit(&mut self, text: &str) {
        self.store.push_user(escape_markers(text));
        self.pending_generation = true;
    }

    /// Stage a regeneration: remove the last turn iff it is an assistant
    /// turn, keeping it in the rollback slot. Returns false (and stages
    /// nothing) otherwise.
    pub fn regenerate(&mut self) -> bool {
        if self.store.last().is_some_and(Turn::is_assistant) {
            self.rollback = self.store.pop_last();
            self.pending_generation = true;
            true
        } else {
            false
        }
    }

    /// Remove the last user+assistant pair, or the dangling last turn.
    pub fn remove_last(&mut self) -> Vec<Turn> {
        self.store.pop_last_pair()
    }

    /// Reset the conversation. Confirmation is the caller's concern.
    pub fn clear(&mut self) {
        self.store.clear();
        self.rollback = None;
    }

    /// Render the full transcript, reasoning included.
    pub fn transcript(&self, exported_at: DateTime<Local>) -> String {
        render_transcript(&self.store, exported_at)
    }

    /// Run the pending generation to a terminal outcome.
    ///
    /// Drives decoder and parser over the transport's frame sequence,
    /// relaying live updates to `sink` and polling `cancel` once per
    /// frame. The pending flag is cleared on every exit path -- this is
    /// the resource-release invariant UI gating depends on.
    pub async fn run_generation<T, S>(
        &mut self,
        transport: &T,
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> GenerationOutcome
    where
        T: ChatTransport + ?Sized,
        S: RenderSink,
    {
        let outcome = self.drive_stream(transport, sink, cancel).await;
        self.pending_generation = false;

        match &outcome {
            GenerationOutcome::Completed { answer, reasoning } => {
                self.store.push_assistant(answer.clone(), reasoning.clone());
                self.rollback = None;
            }
            GenerationOutcome::Cancelled => {
                // Return the conversation to its pre-attempt state: restore
                // the answer a regeneration removed, or drop the user turn
                // that triggered a fresh attempt.
                if let Some(Turn::Assistant { visible, reasoning }) = self.rollback.take() {
                    self.store.push_assistant(visible, reasoning);
                } else if self.store.last().is_some_and(Turn::is_user) {
                    self.store.pop_last();
                }
            }
            GenerationOutcome::Malformed(err) => {
                sink.on_error(&err.to_string());
                self.rollback = None;
            }
            GenerationOutcome::TransportFailed(err) => {
                sink.on_error(&err.to_string());
                if let Some(Turn::Assistant { visible, reasoning }) = self.rollback.take() {
                    self.store.push_assistant(visible, reasoning);
                }
            }
        }

        outcome
    }

    async fn drive_stream<T, S>(
        &self,
        transport: &T,
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> GenerationOutcome
    where
        T: ChatTransport + ?Sized,
        S: RenderSink,
    {
        let request = self.build_request();
        if self.config.debug {
            debug!(payload = ?request, "submitting completion request");
        }

        let mut frames = transport.send(request);
        let mut parser = TagSpanParser::new();

        while let Some(frame) = frames.next().await {
            // Cooperative cancellation: polled once per frame, before the
            // frame is processed.
            if cancel.is_cancelled() {
                let (answer, reasoning) = parser.into_partials();
                debug!(
                    answer_len = answer.len(),
                    reasoning_len = reasoning.len(),
                    "generation cancelled, discarding partial content"
                );
                return GenerationOutcome::Cancelled;
            }

            let frame = match frame {
                Ok(frame) => frame,
                Err(err) => return GenerationOutcome::TransportFailed(err),
            };
            let Some(delta) = decode_frame(&frame, self.config.debug) else {
                continue;
            };
            let events = match parser.feed(&delta) {
                Ok(events) => events,
                Err(err) => return GenerationOutcome::Malformed(err),
            };
            for event in events {
                match event {
                    SpanEvent::AnswerDelta(_) => sink.on_answer_update(parser.answer()),
                    SpanEvent::ReasoningDelta(_) => {
                        sink.on_reasoning_update(parser.reasoning(), false);
                    }
                    SpanEvent::ReasoningComplete => {
                        sink.on_reasoning_update(parser.reasoning(), true);
                    }
                }
            }
        }

        if cancel.is_cancelled() {
            return GenerationOutcome::Cancelled;
        }

        if self.config.debug {
            debug!(raw = %parser.raw(), "final raw output");
        }
        match parser.finish() {
            Ok((answer, reasoning)) => {
                let answer = answer.trim().to_string();
                let reasoning = reasoning.trim().to_string();
                GenerationOutcome::Completed {
                    answer,
                    reasoning: (!reasoning.is_empty()).then_some(reasoning),
                }
            }
            Err(err) => GenerationOutcome::Malformed(err),
        }
    }

    /// Assemble the outgoing payload: redacted projection, budget
    /// eviction, then the optional reasoning-forcing system message --
    /// prepended after eviction so it is never evicted itself.
    fn build_request(&self) -> CompletionRequest {
        let assembled = assemble(&self.store, self.config.max_context);
        let mut messages = assembled.messages;
        if self.config.prepend_think {
            messages.insert(0, Message::new(MessageRole::System, "<think>\n"));
        }
        CompletionRequest {
            model: self.config.model.clone(),
            messages,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            stream: true,
        }
    }
}
