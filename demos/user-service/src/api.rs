//! Typed client surface.
//!
//! Compiled against the same contract the server binds handlers to, so a
//! caller cannot construct a request the contract does not describe.

use std::sync::Arc;

use url::Url;

use accord_client::{ClientConfig, ClientResult, RpcClient};
use accord_contract::ContractError;

use crate::contract::contract;
use crate::model::{NewUser, User};

/// Typed facade over the user-service procedures.
pub struct UserApi {
    client: RpcClient,
}

impl UserApi {
    pub fn new(base_url: Url) -> Result<Self, ContractError> {
        let contract = Arc::new(contract()?);
        Ok(Self {
            client: RpcClient::new(contract, ClientConfig::new(base_url)),
        })
    }

    /// Build against an existing client, e.g. one with validation
    /// toggles changed.
    pub fn with_client(client: RpcClient) -> Self {
        Self { client }
    }

    pub async fn create_user(&self, new_user: &NewUser) -> ClientResult<User> {
        self.client.call_as("createUser", new_user).await
    }

    pub async fn get_users(&self) -> ClientResult<Vec<User>> {
        self.client.call_void("getUsers").await
    }
}
