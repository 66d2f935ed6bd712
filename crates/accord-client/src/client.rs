//! The RPC client.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use accord_contract::{Contract, ErrorBody, Issue, ProcedureContract, ResponseStatus};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Contract-checked RPC caller.
///
/// Holds a read-only reference to the shared contract and never mutates
/// it. Calls are `POST <base_url>/<procedure>` with a JSON body; a void
/// input is sent as JSON `null`, matching what the server accepts for
/// procedures without an input schema. The client never retries on its
/// own — retry policy belongs to the surrounding application.
pub struct RpcClient {
    http: reqwest::Client,
    contract: Arc<Contract>,
    config: ClientConfig,
}

impl RpcClient {
    pub fn new(contract: Arc<Contract>, config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            contract,
            config,
        }
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Call a procedure with a raw JSON payload.
    ///
    /// Resolves on a success response with the decoded body; any other
    /// status rejects with [`ClientError::Call`] carrying the status
    /// kind and the server-supplied message and issues.
    pub async fn call(&self, procedure: &str, input: Option<Value>) -> ClientResult<Value> {
        let entry = self
            .contract
            .get(procedure)
            .ok_or_else(|| ClientError::UnknownProcedure(procedure.to_string()))?;

        if self.config.validate_input {
            check_input(entry, input.as_ref())?;
        }

        let url = self.config.base_url.join(procedure)?;
        debug!(procedure, %url, "sending RPC call");

        let response = self
            .http
            .post(url)
            .json(input.as_ref().unwrap_or(&Value::Null))
            .send()
            .await?;

        let status = ResponseStatus::from_http_status(response.status().as_u16());
        if status.is_success() {
            let body: Value = response.json().await?;
            if self.config.validate_output
                && let Some(schema) = entry.output()
            {
                schema
                    .validate(&body)
                    .map_err(ClientError::ResponseMismatch)?;
            }
            Ok(body)
        } else {
            let body: ErrorBody = response
                .json()
                .await
                .unwrap_or_else(|_| ErrorBody::new("request failed"));
            debug!(procedure, ?status, error = body.error, "call rejected");
            Err(ClientError::Call {
                kind: status,
                message: body.error,
                issues: body.issues.unwrap_or_default(),
            })
        }
    }

    /// Typed call surface: serialize the input, deserialize the output.
    pub async fn call_as<I, O>(&self, procedure: &str, input: &I) -> ClientResult<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let value = serde_json::to_value(input)?;
        let payload = if value.is_null() { None } else { Some(value) };
        let body = self.call(procedure, payload).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Typed call for procedures that take no input.
    pub async fn call_void<O>(&self, procedure: &str) -> ClientResult<O>
    where
        O: DeserializeOwned,
    {
        let body = self.call(procedure, None).await?;
        Ok(serde_json::from_value(body)?)
    }
}

/// Defense-in-depth: reject payloads the server would reject, without
/// spending a network round trip.
fn check_input(entry: &ProcedureContract, input: Option<&Value>) -> ClientResult<()> {
    match (entry.input(), input) {
        (Some(schema), Some(value)) => {
            schema.validate(value).map_err(ClientError::InvalidInput)
        }
        (Some(_), None) => Err(ClientError::InvalidInput(vec![Issue::new(
            "",
            "a request body is required",
        )])),
        (None, Some(value)) if !value.is_null() => Err(ClientError::InvalidInput(vec![
            Issue::new("", "procedure takes no input"),
        ])),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accord_contract::{Procedure, Schema};
    use serde_json::json;

    fn client() -> RpcClient {
        let contract = Arc::new(
            Contract::builder()
                .procedure(
                    "createUser",
                    Procedure::new()
                        .input(Schema::object().field("name", Schema::string().min_length(1))),
                )
                .unwrap()
                .procedure("getUsers", Procedure::new())
                .unwrap()
                .build(),
        );
        // Unroutable port: these tests must fail before any I/O happens.
        RpcClient::new(
            contract,
            ClientConfig::new("http://127.0.0.1:1".parse().unwrap()),
        )
    }

    #[tokio::test]
    async fn unknown_procedure_is_rejected_locally() {
        let err = client().call("deleteUser", None).await.unwrap_err();
        assert!(matches!(err, ClientError::UnknownProcedure(name) if name == "deleteUser"));
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_before_sending() {
        let err = client()
            .call("createUser", Some(json!({"name": ""})))
            .await
            .unwrap_err();
        match err {
            ClientError::InvalidInput(issues) => {
                assert_eq!(issues.len(), 1);
                assert_eq!(issues[0].path, "name");
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn void_procedure_rejects_a_payload_locally() {
        let err = client()
            .call("getUsers", Some(json!({"page": 1})))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidInput(_)));
    }
}
