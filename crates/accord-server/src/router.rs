//! Binding handlers to contract entries.
//!
//! The router is the explicit, immutable lookup table the dispatcher
//! resolves procedure names against. It is assembled once at startup —
//! every bind is checked against the contract there and then — and is
//! only ever read afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use accord_contract::{Contract, ContractError, ProcedureContract};

use crate::handler::ProcedureHandler;

/// One contract entry together with its executable handler.
pub struct ProcedureBinding<Ctx> {
    contract: ProcedureContract,
    handler: Arc<dyn ProcedureHandler<Ctx>>,
}

impl<Ctx> ProcedureBinding<Ctx> {
    pub fn contract(&self) -> &ProcedureContract {
        &self.contract
    }

    pub fn handler(&self) -> &Arc<dyn ProcedureHandler<Ctx>> {
        &self.handler
    }
}

/// Builder for [`Router`]. All mistakes — binding a name the contract
/// does not define, binding a name twice, leaving a contract entry
/// unbound — fail at build time, before the server starts serving.
pub struct RouterBuilder<Ctx> {
    contract: Arc<Contract>,
    bindings: HashMap<String, ProcedureBinding<Ctx>>,
}

impl<Ctx> RouterBuilder<Ctx> {
    pub fn new(contract: Arc<Contract>) -> Self {
        Self {
            contract,
            bindings: HashMap::new(),
        }
    }

    /// Bind a handler to the named contract entry.
    pub fn bind<H>(mut self, name: &str, handler: H) -> Result<Self, ContractError>
    where
        H: ProcedureHandler<Ctx> + 'static,
    {
        let entry = self
            .contract
            .get(name)
            .ok_or_else(|| ContractError::UnknownProcedure(name.to_string()))?;
        if self.bindings.contains_key(name) {
            return Err(ContractError::DuplicateBinding(name.to_string()));
        }
        self.bindings.insert(
            name.to_string(),
            ProcedureBinding {
                contract: entry.clone(),
                handler: Arc::new(handler),
            },
        );
        Ok(self)
    }

    /// Finish the table. Fails if any contract entry is left unbound:
    /// exactly one binding per entry.
    pub fn build(self) -> Result<Router<Ctx>, ContractError> {
        for procedure in self.contract.procedures() {
            if !self.bindings.contains_key(procedure.name()) {
                return Err(ContractError::MissingHandler(procedure.name().to_string()));
            }
        }
        Ok(Router {
            bindings: self.bindings,
        })
    }
}

/// The immutable procedure-binding table. Created once at startup, never
/// mutated, looked up read-only per request.
pub struct Router<Ctx> {
    bindings: HashMap<String, ProcedureBinding<Ctx>>,
}

impl<Ctx> Router<Ctx> {
    pub fn builder(contract: Arc<Contract>) -> RouterBuilder<Ctx> {
        RouterBuilder::new(contract)
    }

    pub fn get(&self, name: &str) -> Option<&ProcedureBinding<Ctx>> {
        self.bindings.get(name)
    }

    pub fn procedure_names(&self) -> Vec<&str> {
        self.bindings.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accord_contract::{Procedure, Schema};
    use serde_json::json;

    use crate::handler::handler_fn;

    fn contract() -> Arc<Contract> {
        Arc::new(
            Contract::builder()
                .procedure("ping", Procedure::new().output(Schema::string()))
                .unwrap()
                .build(),
        )
    }

    fn ping_handler() -> impl ProcedureHandler<()> + 'static {
        handler_fn(|_input, _ctx: ()| async move { Ok(json!("pong")) })
    }

    #[test]
    fn binds_against_the_contract() {
        let router = Router::builder(contract())
            .bind("ping", ping_handler())
            .unwrap()
            .build()
            .unwrap();
        assert!(router.get("ping").is_some());
        assert!(router.get("pong").is_none());
    }

    #[test]
    fn unknown_name_fails_at_bind_time() {
        let result = Router::<()>::builder(contract()).bind("nope", ping_handler());
        assert!(matches!(result, Err(ContractError::UnknownProcedure(_))));
    }

    #[test]
    fn double_bind_fails() {
        let result = Router::builder(contract())
            .bind("ping", ping_handler())
            .unwrap()
            .bind("ping", ping_handler());
        assert!(matches!(result, Err(ContractError::DuplicateBinding(_))));
    }

    #[test]
    fn unbound_entry_fails_at_build_time() {
        let result = Router::<()>::builder(contract()).build();
        assert!(matches!(result, Err(ContractError::MissingHandler(name)) if name == "ping"));
    }
}
