//! Observability for ledgerdoc
//!
//! Structured JSON logging of lifecycle events. Logging never changes
//! the outcome of an operation.
//!
//! ```ignore
//! use ledgerdoc::observability::{Event, log_event_with_fields};
//!
//! log_event_with_fields(Event::InvokeReceived, &[("function", "ReadUserInfo")]);
//! log_event_with_fields(Event::QueryComplete, &[("rows", "3")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = match event {
        e if e.is_fatal() => Severity::Fatal,
        Event::ErrorResponse => Severity::Error,
        Event::UnknownFunction | Event::CursorCloseFailed => Severity::Warn,
        Event::QueryBegin
        | Event::QueryComplete
        | Event::HistoryBegin
        | Event::HistoryComplete
        | Event::IndexCreated
        | Event::IndexRemoved => Severity::Trace,
        _ => Severity::Info,
    };
    Logger::log(severity, event.as_str(), fields);
}
