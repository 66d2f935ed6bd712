//! # Accord Server
//!
//! Server side of the accord RPC core: binds handlers to the shared
//! contract, dispatches inbound request envelopes through validation and
//! execution, and exposes the result over a plain HTTP transport.
//!
//! The dispatch pipeline per request is
//! resolve → validate input → execute handler → validate output → encode,
//! with every failure mapped to a status + JSON error body. Validation
//! and resolution errors never reach a handler; handler errors never
//! reach the client unwrapped.

pub mod cors;
pub mod dispatch;
pub mod handler;
pub mod http;
pub mod router;

// Re-export main types
pub use cors::CorsLayer;
pub use dispatch::Dispatcher;
pub use handler::{FnHandler, HandlerError, ProcedureHandler, handler_fn};
pub use http::{HttpRpcServer, HttpRpcServerBuilder, ServerConfig};
pub use router::{Router, RouterBuilder};

/// Result alias for server setup operations
pub type Result<T> = std::result::Result<T, accord_contract::ContractError>;
