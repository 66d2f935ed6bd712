//! # Accord Contract
//!
//! The shared, authoritative declaration of RPC procedures: names, input
//! shapes and output shapes. Both the server (handler binding, dispatch)
//! and the client (call surface) compile against the same [`Contract`]
//! value, which is what keeps the two ends from drifting out of sync.
//!
//! This crate is transport-agnostic: it knows about JSON values and wire
//! envelopes, not about HTTP.

pub mod contract;
pub mod envelope;
pub mod error;
pub mod schema;

// Re-export main types
pub use contract::{Contract, ContractBuilder, Procedure, ProcedureContract};
pub use envelope::{ErrorBody, RequestEnvelope, ResponseEnvelope, ResponseStatus};
pub use error::{ContractError, DispatchError};
pub use schema::{Issue, Schema};
