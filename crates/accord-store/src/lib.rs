//! # Record Store Abstractions
//!
//! The persistence collaborator RPC handlers reach through their request
//! context. The dispatch core treats it as opaque: one insert or one
//! select per handler call, each logically atomic; coordinating
//! concurrent writers is the store's job, not the dispatcher's.

mod traits;
pub use traits::{RecordStore, StoreResult};

pub mod in_memory;
pub use in_memory::InMemoryStore;
