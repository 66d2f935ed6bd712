//! The executable side of a procedure.

use async_trait::async_trait;
use serde_json::Value;

/// Error type handlers may fail with. The dispatcher wraps it into a
/// server-error response; the cause never reaches the client unwrapped.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// The implementation bound to one procedure.
///
/// `input` is already validated against the procedure's input schema by
/// the time this runs (`None` for procedures that declare no input).
/// `Ctx` is opaque to the core; it carries per-request collaborator state
/// such as a store handle and is cloned per request by the dispatcher.
#[async_trait]
pub trait ProcedureHandler<Ctx>: Send + Sync {
    async fn handle(&self, input: Option<Value>, ctx: Ctx) -> Result<Value, HandlerError>;
}

/// Adapter turning an async closure into a [`ProcedureHandler`].
pub struct FnHandler<F> {
    f: F,
}

/// Wrap an async closure as a procedure handler.
///
/// ```no_run
/// # use accord_server::handler_fn;
/// # use serde_json::Value;
/// let echo = handler_fn(|input: Option<Value>, _ctx: ()| async move {
///     Ok(input.unwrap_or(Value::Null))
/// });
/// ```
pub fn handler_fn<F, Fut, Ctx>(f: F) -> FnHandler<F>
where
    F: Fn(Option<Value>, Ctx) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, HandlerError>> + Send + 'static,
{
    FnHandler { f }
}

#[async_trait]
impl<F, Fut, Ctx> ProcedureHandler<Ctx> for FnHandler<F>
where
    Ctx: Send + 'static,
    F: Fn(Option<Value>, Ctx) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, HandlerError>> + Send + 'static,
{
    async fn handle(&self, input: Option<Value>, ctx: Ctx) -> Result<Value, HandlerError> {
        (self.f)(input, ctx).await
    }
}
