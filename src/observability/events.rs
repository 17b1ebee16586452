//! Lifecycle events emitted by ledgerdoc
//!
//! Events are explicit and typed; each maps to one stable log name.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Init invocation begins
    InitStart,
    /// Init wrote its markers
    InitComplete,
    /// Configuration loaded
    ConfigLoaded,
    /// CLI serving loop started
    Serving,
    /// CLI serving loop reached end of input
    ServingComplete,

    // Dispatch
    /// Invocation received
    InvokeReceived,
    /// No handler registered for the function name
    UnknownFunction,
    /// Business-level error envelope produced
    ErrorResponse,
    /// Envelope itself could not be serialized
    EnvelopeSerializationFailed,

    // Documents
    /// Document persisted
    DocumentWritten,
    /// Mutation skipped because nothing changed
    DocumentUnchanged,
    /// Composite index marker written
    IndexCreated,
    /// Composite index marker removed
    IndexRemoved,

    // Queries
    /// Predicate query begins
    QueryBegin,
    /// Predicate query complete
    QueryComplete,
    /// History reconstruction begins
    HistoryBegin,
    /// History reconstruction complete
    HistoryComplete,
    /// A cursor failed to close cleanly
    CursorCloseFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::InitStart => "INIT_BEGIN",
            Event::InitComplete => "INIT_COMPLETE",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::Serving => "SERVING",
            Event::ServingComplete => "SERVING_COMPLETE",

            Event::InvokeReceived => "INVOKE_BEGIN",
            Event::UnknownFunction => "INVOKE_UNKNOWN_FUNCTION",
            Event::ErrorResponse => "ERROR_RESPONSE",
            Event::EnvelopeSerializationFailed => "ENVELOPE_SERIALIZATION_FAILED",

            Event::DocumentWritten => "DOCUMENT_WRITTEN",
            Event::DocumentUnchanged => "DOCUMENT_UNCHANGED",
            Event::IndexCreated => "INDEX_CREATED",
            Event::IndexRemoved => "INDEX_REMOVED",

            Event::QueryBegin => "QUERY_BEGIN",
            Event::QueryComplete => "QUERY_COMPLETE",
            Event::HistoryBegin => "HISTORY_BEGIN",
            Event::HistoryComplete => "HISTORY_COMPLETE",
            Event::CursorCloseFailed => "CURSOR_CLOSE_FAILED",
        }
    }

    /// Returns true if the event means the caller gets a transport-level error
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::EnvelopeSerializationFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
