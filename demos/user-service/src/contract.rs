//! The shared contract and its schemas.
//!
//! Input validation policy: a name must be non-empty and not
//! whitespace-only, an email must look like an email. This is the one
//! canonical policy for the whole service; server and client both
//! enforce it through the same contract value.

use accord_contract::{Contract, ContractError, Procedure, Schema};

/// Schema for the `createUser` input.
pub fn insert_user_schema() -> Schema {
    Schema::object()
        .field("name", Schema::string().min_length(1))
        .field("email", Schema::string().email())
        .refine(
            "name",
            "Name cannot be empty or contain only whitespace",
            |v| v["name"].as_str().is_none_or(|s| !s.trim().is_empty()),
        )
}

/// Schema for a stored user, as every procedure returns it.
pub fn select_user_schema() -> Schema {
    Schema::object()
        .field("id", Schema::integer())
        .field("name", Schema::string())
        .field("email", Schema::string())
        .field("createdAt", Schema::date_time())
}

/// Build the service contract: `createUser` and `getUsers`.
pub fn contract() -> Result<Contract, ContractError> {
    Ok(Contract::builder()
        .procedure(
            "createUser",
            Procedure::new()
                .input(insert_user_schema())
                .output(select_user_schema()),
        )?
        .procedure(
            "getUsers",
            Procedure::new().output(Schema::array_of(select_user_schema())),
        )?
        .build())
}
