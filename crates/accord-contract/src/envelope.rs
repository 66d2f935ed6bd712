//! Wire envelopes and the response status vocabulary.
//!
//! On the wire a call is `POST /<procedureName>` with a JSON body; the
//! response status is carried by the HTTP status code and the body is
//! either the encoded output or a JSON [`ErrorBody`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::Issue;

/// One inbound call: a procedure name plus its raw, not-yet-validated
/// payload. Constructed per request and consumed exactly once by the
/// dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEnvelope {
    pub procedure: String,
    pub payload: Option<Value>,
}

impl RequestEnvelope {
    pub fn new(procedure: impl Into<String>, payload: Option<Value>) -> Self {
        Self {
            procedure: procedure.into(),
            payload,
        }
    }
}

/// Outcome classification of a dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Success,
    ClientError,
    NotFound,
    ServerError,
}

impl ResponseStatus {
    pub fn http_status(&self) -> u16 {
        match self {
            ResponseStatus::Success => 200,
            ResponseStatus::ClientError => 400,
            ResponseStatus::NotFound => 404,
            ResponseStatus::ServerError => 500,
        }
    }

    /// Classify an HTTP status code received by the client.
    pub fn from_http_status(code: u16) -> Self {
        match code {
            200..=299 => ResponseStatus::Success,
            404 => ResponseStatus::NotFound,
            400..=499 => ResponseStatus::ClientError,
            _ => ResponseStatus::ServerError,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResponseStatus::Success)
    }
}

/// The dispatcher's terminal product for one request: a status plus the
/// JSON body to put on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub status: ResponseStatus,
    pub body: Value,
}

impl ResponseEnvelope {
    pub fn success(body: Value) -> Self {
        Self {
            status: ResponseStatus::Success,
            body,
        }
    }

    pub fn error(status: ResponseStatus, body: ErrorBody) -> Self {
        // ErrorBody serialization cannot fail: it is a struct of strings.
        let body = serde_json::to_value(body).unwrap_or(Value::Null);
        Self { status, body }
    }
}

/// JSON body of every non-success response: `{"error": ...}` with
/// itemized `issues` attached for client errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<Issue>>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            issues: None,
        }
    }

    pub fn with_issues(error: impl Into<String>, issues: Vec<Issue>) -> Self {
        Self {
            error: error.into(),
            issues: Some(issues),
        }
    }
}
