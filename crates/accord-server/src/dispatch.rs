//! The per-request dispatch pipeline.
//!
//! A request envelope moves through resolve → validate → execute →
//! encode; any step may divert to an error, and exactly one terminal
//! response is produced per envelope. The dispatcher holds no mutable
//! state between requests — only the immutable binding table behind an
//! `Arc` — so concurrent requests share nothing and need no locking.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error};

use accord_contract::{
    DispatchError, Issue, ProcedureContract, RequestEnvelope, ResponseEnvelope,
};

use crate::router::Router;

/// Resolves inbound envelopes against the binding table and executes the
/// bound handler. Cheap to clone; clones share the same table.
pub struct Dispatcher<Ctx> {
    router: Arc<Router<Ctx>>,
}

impl<Ctx> Clone for Dispatcher<Ctx> {
    fn clone(&self) -> Self {
        Self {
            router: Arc::clone(&self.router),
        }
    }
}

impl<Ctx> Dispatcher<Ctx>
where
    Ctx: Clone + Send + Sync + 'static,
{
    pub fn new(router: Router<Ctx>) -> Self {
        Self {
            router: Arc::new(router),
        }
    }

    /// Dispatch one request envelope to its terminal response.
    ///
    /// The envelope is consumed; per-request errors are mapped to their
    /// wire envelope here and never escape as panics or process exits.
    pub async fn dispatch(&self, envelope: RequestEnvelope, ctx: Ctx) -> ResponseEnvelope {
        let procedure = envelope.procedure.clone();
        match self.run(envelope, ctx).await {
            Ok(response) => {
                debug!(procedure, "dispatch complete");
                response
            }
            Err(err) => {
                match &err {
                    DispatchError::ContractViolation(issues) => {
                        // The handler and its own declared output shape
                        // disagree. That is a server bug; log it loudly.
                        error!(procedure, ?issues, "handler output violates its declared contract");
                    }
                    DispatchError::HandlerFailure(cause) => {
                        error!(procedure, %cause, "handler failed");
                    }
                    DispatchError::InvalidInput(issues) => {
                        debug!(procedure, ?issues, "rejected invalid input");
                    }
                    DispatchError::ProcedureNotFound(_) => {
                        debug!(procedure, "procedure not found");
                    }
                }
                err.into_envelope()
            }
        }
    }

    async fn run(
        &self,
        envelope: RequestEnvelope,
        ctx: Ctx,
    ) -> Result<ResponseEnvelope, DispatchError> {
        // Resolving
        let binding = self
            .router
            .get(&envelope.procedure)
            .ok_or_else(|| DispatchError::ProcedureNotFound(envelope.procedure.clone()))?;

        // Validating
        let input = validate_input(binding.contract(), envelope.payload)?;

        // Executing
        let result = binding
            .handler()
            .handle(input, ctx)
            .await
            .map_err(DispatchError::HandlerFailure)?;

        // Encoding: the output boundary is validated too. An entry with
        // no output schema discards the handler's return value.
        let body = match binding.contract().output() {
            Some(schema) => {
                schema
                    .validate(&result)
                    .map_err(DispatchError::ContractViolation)?;
                result
            }
            None => Value::Null,
        };
        Ok(ResponseEnvelope::success(body))
    }
}

/// Check the raw payload against the entry's input schema.
///
/// An entry with no input schema accepts only an absent payload; JSON
/// `null` counts as absent since that is how a void input is spelled on
/// the wire. Anything else is rejected as invalid input.
fn validate_input(
    contract: &ProcedureContract,
    payload: Option<Value>,
) -> Result<Option<Value>, DispatchError> {
    match (contract.input(), payload) {
        (Some(schema), Some(value)) => {
            schema.validate(&value).map_err(DispatchError::InvalidInput)?;
            Ok(Some(value))
        }
        (Some(_), None) => Err(DispatchError::InvalidInput(vec![Issue::new(
            "",
            "a request body is required",
        )])),
        (None, None) | (None, Some(Value::Null)) => Ok(None),
        (None, Some(_)) => Err(DispatchError::InvalidInput(vec![Issue::new(
            "",
            "procedure takes no input",
        )])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accord_contract::{Contract, Procedure, ResponseStatus, Schema};
    use serde_json::json;

    use crate::handler::handler_fn;

    #[derive(Clone)]
    struct Greeting(&'static str);

    fn dispatcher() -> Dispatcher<Greeting> {
        let contract = Arc::new(
            Contract::builder()
                .procedure(
                    "greet",
                    Procedure::new()
                        .input(
                            Schema::object().field("name", Schema::string().min_length(1)),
                        )
                        .output(Schema::object().field("message", Schema::string())),
                )
                .unwrap()
                .procedure(
                    "version",
                    Procedure::new().output(Schema::string()),
                )
                .unwrap()
                .procedure("lyingOutput", Procedure::new().output(Schema::integer()))
                .unwrap()
                .procedure("failing", Procedure::new())
                .unwrap()
                .procedure("fireAndForget", Procedure::new())
                .unwrap()
                .build(),
        );

        let router = Router::builder(contract)
            .bind(
                "greet",
                handler_fn(|input: Option<Value>, ctx: Greeting| async move {
                    let name = input.as_ref().and_then(|v| v["name"].as_str()).unwrap_or("");
                    Ok(json!({"message": format!("{} {name}", ctx.0)}))
                }),
            )
            .unwrap()
            .bind(
                "version",
                handler_fn(|_input, _ctx: Greeting| async move { Ok(json!("1.0.0")) }),
            )
            .unwrap()
            .bind(
                "lyingOutput",
                handler_fn(|_input, _ctx: Greeting| async move { Ok(json!("not an integer")) }),
            )
            .unwrap()
            .bind(
                "failing",
                handler_fn(|_input, _ctx: Greeting| async move {
                    Err::<Value, _>("store unavailable".into())
                }),
            )
            .unwrap()
            .bind(
                "fireAndForget",
                handler_fn(|_input, _ctx: Greeting| async move { Ok(json!({"ignored": true})) }),
            )
            .unwrap()
            .build()
            .unwrap();
        Dispatcher::new(router)
    }

    #[tokio::test]
    async fn valid_input_reaches_success() {
        let response = dispatcher()
            .dispatch(
                RequestEnvelope::new("greet", Some(json!({"name": "Ann"}))),
                Greeting("Hello"),
            )
            .await;
        assert_eq!(response.status, ResponseStatus::Success);
        assert_eq!(response.body, json!({"message": "Hello Ann"}));
    }

    #[tokio::test]
    async fn invalid_input_enumerates_every_issue() {
        let response = dispatcher()
            .dispatch(
                RequestEnvelope::new("greet", Some(json!({"name": ""}))),
                Greeting("Hello"),
            )
            .await;
        assert_eq!(response.status, ResponseStatus::ClientError);
        let issues = response.body["issues"].as_array().unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0]["path"], "name");
    }

    #[tokio::test]
    async fn missing_body_for_declared_input_is_a_client_error() {
        let response = dispatcher()
            .dispatch(RequestEnvelope::new("greet", None), Greeting("Hello"))
            .await;
        assert_eq!(response.status, ResponseStatus::ClientError);
    }

    #[tokio::test]
    async fn unknown_procedure_is_not_found() {
        let response = dispatcher()
            .dispatch(RequestEnvelope::new("vanish", None), Greeting("Hello"))
            .await;
        assert_eq!(response.status, ResponseStatus::NotFound);
        assert_eq!(response.body["error"], "procedure 'vanish' not found");
    }

    #[tokio::test]
    async fn void_input_accepts_absent_and_null_payloads() {
        let dispatcher = dispatcher();
        for payload in [None, Some(Value::Null)] {
            let response = dispatcher
                .dispatch(RequestEnvelope::new("version", payload), Greeting("Hello"))
                .await;
            assert_eq!(response.status, ResponseStatus::Success);
            assert_eq!(response.body, json!("1.0.0"));
        }
    }

    #[tokio::test]
    async fn void_input_rejects_a_real_body() {
        let response = dispatcher()
            .dispatch(
                RequestEnvelope::new("version", Some(json!({"surprise": 1}))),
                Greeting("Hello"),
            )
            .await;
        assert_eq!(response.status, ResponseStatus::ClientError);
    }

    #[tokio::test]
    async fn handler_failure_is_a_server_error_with_the_cause() {
        let response = dispatcher()
            .dispatch(RequestEnvelope::new("failing", None), Greeting("Hello"))
            .await;
        assert_eq!(response.status, ResponseStatus::ServerError);
        assert_eq!(response.body["error"], "handler failed: store unavailable");
    }

    #[tokio::test]
    async fn contract_violation_is_a_server_error() {
        let response = dispatcher()
            .dispatch(RequestEnvelope::new("lyingOutput", None), Greeting("Hello"))
            .await;
        assert_eq!(response.status, ResponseStatus::ServerError);
        // The mismatching value itself never reaches the wire.
        assert!(response.body.get("issues").is_none());
    }

    #[tokio::test]
    async fn absent_output_schema_discards_the_result() {
        let response = dispatcher()
            .dispatch(RequestEnvelope::new("fireAndForget", None), Greeting("Hello"))
            .await;
        assert_eq!(response.status, ResponseStatus::Success);
        assert_eq!(response.body, Value::Null);
    }

    #[tokio::test]
    async fn concurrent_dispatches_do_not_interfere() {
        let dispatcher = dispatcher();
        let mut tasks = Vec::new();
        for i in 0..8 {
            let dispatcher = dispatcher.clone();
            tasks.push(tokio::spawn(async move {
                dispatcher
                    .dispatch(
                        RequestEnvelope::new("greet", Some(json!({"name": format!("u{i}")}))),
                        Greeting("Hi"),
                    )
                    .await
            }));
        }
        for (i, task) in tasks.into_iter().enumerate() {
            let response = task.await.unwrap();
            assert_eq!(response.body["message"], format!("Hi u{i}"));
        }
    }
}
