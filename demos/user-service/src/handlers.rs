//! Procedure handlers and their request context.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use accord_contract::{Contract, ContractError};
use accord_server::{HandlerError, ProcedureHandler, Router};
use accord_store::{InMemoryStore, RecordStore};

use crate::model::{NewUser, User, UserStore};

/// Per-request collaborator state; cloned per request by the dispatcher.
#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<UserStore>,
}

/// Build the user store. The materialize step assigns the id and the
/// created-at timestamp, which is why they never appear in the input
/// shape.
pub fn user_store() -> UserStore {
    InMemoryStore::new(|id, new: NewUser| User {
        id: id as i64,
        name: new.name,
        email: new.email,
        created_at: Utc::now(),
    })
}

/// `createUser`: insert one validated user, return it as stored.
pub struct CreateUser;

#[async_trait]
impl ProcedureHandler<AppContext> for CreateUser {
    async fn handle(&self, input: Option<Value>, ctx: AppContext) -> Result<Value, HandlerError> {
        let input = input.ok_or("createUser requires an input payload")?;
        let new_user: NewUser = serde_json::from_value(input)?;
        let user = ctx.store.insert(new_user).await?;
        debug!(user_id = user.id, "created user");
        Ok(serde_json::to_value(user)?)
    }
}

/// `getUsers`: return every stored user in insertion order.
pub struct GetUsers;

#[async_trait]
impl ProcedureHandler<AppContext> for GetUsers {
    async fn handle(&self, _input: Option<Value>, ctx: AppContext) -> Result<Value, HandlerError> {
        let users = ctx.store.select_all().await?;
        Ok(serde_json::to_value(users)?)
    }
}

/// Bind every contract entry to its handler.
pub fn router(contract: Arc<Contract>) -> Result<Router<AppContext>, ContractError> {
    Router::builder(contract)
        .bind("createUser", CreateUser)?
        .bind("getUsers", GetUsers)?
        .build()
}
