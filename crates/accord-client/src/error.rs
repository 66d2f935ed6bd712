//! Error types for client-side RPC operations.

use thiserror::Error;

use accord_contract::{Issue, ResponseStatus};

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors a call can fail with, locally or from the server.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The procedure name is not in the contract; caught before any I/O.
    #[error("procedure '{0}' is not defined in the contract")]
    UnknownProcedure(String),

    /// Client-side input validation rejected the payload before sending.
    #[error("invalid input")]
    InvalidInput(Vec<Issue>),

    #[error("invalid procedure URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server answered with a non-success status.
    #[error("call failed ({kind:?}): {message}")]
    Call {
        kind: ResponseStatus,
        message: String,
        issues: Vec<Issue>,
    },

    /// A successful response body that does not match the declared
    /// output schema (only raised when response validation is enabled).
    #[error("response does not match the declared output schema")]
    ResponseMismatch(Vec<Issue>),
}
