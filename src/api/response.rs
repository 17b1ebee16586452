//! Response envelope
//!
//! Every invocation answers with `{code, data, error}` wrapped in a
//! transport-level peer response. Business failures travel inside the
//! envelope with status 200; only an envelope that cannot be serialized
//! produces status 500.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::observability::{log_event_with_fields, Event};
use crate::service::ServiceError;

/// Transport status of a delivered envelope
pub const STATUS_OK: i32 = 200;
/// Transport status when the envelope itself failed
pub const STATUS_ERROR: i32 = 500;

/// Envelope result codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    Success,
    ArgumentError,
    AlreadyExists,
    NotFound,
    SystemError,
}

impl ResponseCode {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseCode::Success => "1000",
            ResponseCode::ArgumentError => "2000",
            ResponseCode::AlreadyExists => "2010",
            ResponseCode::NotFound => "2020",
            ResponseCode::SystemError => "9999",
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&ServiceError> for ResponseCode {
    fn from(err: &ServiceError) -> Self {
        match err {
            ServiceError::InvalidArgument(_) => ResponseCode::ArgumentError,
            ServiceError::AlreadyExists(_) => ResponseCode::AlreadyExists,
            ServiceError::NotFound(_) => ResponseCode::NotFound,
            ServiceError::System(_) => ResponseCode::SystemError,
        }
    }
}

/// Uniform result object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub code: String,
    pub data: Value,
    pub error: String,
}

impl Envelope {
    pub fn is_success(&self) -> bool {
        self.code == ResponseCode::Success.as_str()
    }
}

/// Transport-level response handed back to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerResponse {
    pub status: i32,
    pub message: String,
    pub payload: Vec<u8>,
}

impl PeerResponse {
    pub fn ok(payload: Vec<u8>) -> Self {
        Self {
            status: STATUS_OK,
            message: String::new(),
            payload,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    /// True when the envelope was delivered and reports success
    pub fn is_ok(&self) -> bool {
        self.envelope().map(|e| e.is_success()).unwrap_or(false)
    }

    /// Decode the carried envelope
    pub fn envelope(&self) -> Option<Envelope> {
        if self.status != STATUS_OK {
            return None;
        }
        serde_json::from_slice(&self.payload).ok()
    }
}

/// Success envelope. Present data must be valid JSON.
pub fn success_response(data: Option<&[u8]>) -> PeerResponse {
    let data = match data {
        None => Value::String(String::new()),
        Some(bytes) => match serde_json::from_slice::<Value>(bytes) {
            Ok(value) => value,
            Err(e) => return error_response(ResponseCode::SystemError, &e.to_string()),
        },
    };
    seal(Envelope {
        code: ResponseCode::Success.as_str().to_string(),
        data,
        error: String::new(),
    })
}

/// Failure envelope with `data: null`
pub fn error_response(code: ResponseCode, message: &str) -> PeerResponse {
    log_event_with_fields(
        Event::ErrorResponse,
        &[("code", code.as_str()), ("error", message)],
    );
    seal(Envelope {
        code: code.as_str().to_string(),
        data: Value::Null,
        error: message.to_string(),
    })
}

/// Envelope for a service error
pub fn service_error_response(err: &ServiceError) -> PeerResponse {
    error_response(ResponseCode::from(err), &err.to_string())
}

fn seal(envelope: Envelope) -> PeerResponse {
    match serde_json::to_vec(&envelope) {
        Ok(payload) => PeerResponse::ok(payload),
        Err(e) => {
            let message = e.to_string();
            log_event_with_fields(Event::EnvelopeSerializationFailed, &[("error", message.as_str())]);
            PeerResponse::error(message)
        }
    }
}
