//! Port for the completion transcript.
//!
//! A completion emits a fixed sequence of [`ConversationEvent`]s: the
//! request, the raw output of every attempt, the violations of each rejected
//! attempt and the final outcome. A [`ConversationLogger`] persists them,
//! typically as JSONL; `tracing` keeps the human-readable diagnostics.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Kind of a transcript event; serialized as the JSONL `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationEventKind {
    /// Request accepted: model, messages and attempt ceiling.
    CompletionRequest,
    /// Raw stdout of one CLI attempt.
    CliOutput,
    /// Violations that rejected one attempt.
    FormatViolations,
    CompletionSuccess,
    CompletionFailed,
}

impl ConversationEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationEventKind::CompletionRequest => "completion_request",
            ConversationEventKind::CliOutput => "cli_output",
            ConversationEventKind::FormatViolations => "format_violations",
            ConversationEventKind::CompletionSuccess => "completion_success",
            ConversationEventKind::CompletionFailed => "completion_failed",
        }
    }
}

impl fmt::Display for ConversationEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One transcript entry: its kind plus a kind-specific JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationEvent {
    pub kind: ConversationEventKind,
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(kind: ConversationEventKind, payload: Value) -> Self {
        Self { kind, payload }
    }
}

/// Sink for transcript events.
///
/// `log` is infallible. A sink that cannot write reports it through
/// `tracing` and the completion carries on.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Discards every event.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
