//! Error taxonomy shared across the RPC core.

use thiserror::Error;

use crate::envelope::{ErrorBody, ResponseEnvelope, ResponseStatus};
use crate::schema::Issue;

/// Registration-time errors. These are fatal: a process that cannot
/// assemble its contract or bindings must not start serving.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("procedure '{0}' is already defined")]
    DuplicateProcedure(String),

    #[error("procedure '{0}' is not defined in the contract")]
    UnknownProcedure(String),

    #[error("procedure '{0}' already has a handler bound")]
    DuplicateBinding(String),

    #[error("procedure '{0}' has no handler bound")]
    MissingHandler(String),
}

/// Per-request dispatch failures. None of these crash the server; each
/// maps to a response status and a wire error body.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("procedure '{0}' not found")]
    ProcedureNotFound(String),

    #[error("invalid input")]
    InvalidInput(Vec<Issue>),

    /// The bound handler failed. The cause message is carried for
    /// diagnostics; it is not assumed safe as user-facing text.
    #[error("handler failed: {0}")]
    HandlerFailure(Box<dyn std::error::Error + Send + Sync>),

    /// The handler returned a value that disagrees with its own declared
    /// output schema. An implementation bug on the server side.
    #[error("handler output violates the declared output schema")]
    ContractViolation(Vec<Issue>),
}

impl DispatchError {
    pub fn status(&self) -> ResponseStatus {
        match self {
            DispatchError::ProcedureNotFound(_) => ResponseStatus::NotFound,
            DispatchError::InvalidInput(_) => ResponseStatus::ClientError,
            DispatchError::HandlerFailure(_) | DispatchError::ContractViolation(_) => {
                ResponseStatus::ServerError
            }
        }
    }

    /// Wrap this error into its wire response. Client errors enumerate
    /// every failing field path; server-side causes surface only as a
    /// status plus message.
    pub fn into_envelope(self) -> ResponseEnvelope {
        let status = self.status();
        let body = match self {
            DispatchError::InvalidInput(issues) => {
                ErrorBody::with_issues("Invalid input", issues)
            }
            other => ErrorBody::new(other.to_string()),
        };
        ResponseEnvelope::error(status, body)
    }
}
