//! # Accord Client
//!
//! The calling side of the accord RPC core. An [`RpcClient`] holds a
//! read-only reference to the same [`Contract`](accord_contract::Contract)
//! the server compiled against, so a call can only be built for a
//! procedure the contract declares; client-side schema validation is
//! defense-in-depth on top of that, not the source of truth.

pub mod client;
pub mod config;
pub mod error;

// Re-export main types
pub use client::RpcClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
