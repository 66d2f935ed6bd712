//! The contract registry: one immutable mapping from procedure name to
//! input/output schema, shared by server and client.

use std::collections::HashMap;

use crate::error::ContractError;
use crate::schema::Schema;

/// The input/output declaration of one procedure, before it is given a
/// name by [`ContractBuilder::procedure`].
#[derive(Debug, Clone, Default)]
pub struct Procedure {
    input: Option<Schema>,
    output: Option<Schema>,
}

impl Procedure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the input schema. A procedure without one accepts only an
    /// absent (or JSON `null`) payload.
    pub fn input(mut self, schema: Schema) -> Self {
        self.input = Some(schema);
        self
    }

    /// Declare the output schema. A procedure without one discards the
    /// handler's return value at the wire.
    pub fn output(mut self, schema: Schema) -> Self {
        self.output = Some(schema);
        self
    }
}

/// One named entry of the contract.
#[derive(Debug, Clone)]
pub struct ProcedureContract {
    name: String,
    input: Option<Schema>,
    output: Option<Schema>,
}

impl ProcedureContract {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input(&self) -> Option<&Schema> {
        self.input.as_ref()
    }

    pub fn output(&self) -> Option<&Schema> {
        self.output.as_ref()
    }
}

/// Builder for [`Contract`]. Duplicate names fail here, at registration
/// time, never at first call.
#[derive(Debug, Default)]
pub struct ContractBuilder {
    procedures: HashMap<String, ProcedureContract>,
}

impl ContractBuilder {
    /// Register a procedure under a unique name.
    pub fn procedure(
        mut self,
        name: impl Into<String>,
        def: Procedure,
    ) -> Result<Self, ContractError> {
        let name = name.into();
        if self.procedures.contains_key(&name) {
            return Err(ContractError::DuplicateProcedure(name));
        }
        self.procedures.insert(
            name.clone(),
            ProcedureContract {
                name,
                input: def.input,
                output: def.output,
            },
        );
        Ok(self)
    }

    pub fn build(self) -> Contract {
        Contract {
            procedures: self.procedures,
        }
    }
}

/// The immutable registry of procedure contracts. Built once at startup
/// and shared (behind `Arc`) by handler binding and the client caller.
#[derive(Debug)]
pub struct Contract {
    procedures: HashMap<String, ProcedureContract>,
}

impl Contract {
    pub fn builder() -> ContractBuilder {
        ContractBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&ProcedureContract> {
        self.procedures.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.procedures.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }

    /// Iterate over every registered procedure.
    pub fn procedures(&self) -> impl Iterator<Item = &ProcedureContract> {
        self.procedures.values()
    }
}
