//! Domain types and the store they live in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use accord_store::InMemoryStore;

/// A stored user, as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// The caller-supplied shape of a user before insertion; id and
/// created-at are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

/// The persistence collaborator handlers reach through the context.
pub type UserStore = InMemoryStore<NewUser, User>;
