//! User-service entry point.
//!
//! Builds the contract, the in-memory store and the binding table, then
//! serves HTTP on 127.0.0.1:3000. Try it with:
//!
//! ```text
//! curl -X POST http://127.0.0.1:3000/createUser \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": "Ann", "email": "ann@example.com"}'
//! curl -X POST http://127.0.0.1:3000/getUsers
//! ```

use std::sync::Arc;

use accord_server::{Dispatcher, HttpRpcServer};
use user_service::{AppContext, contract, router, user_store};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let contract = Arc::new(contract()?);
    let router = router(Arc::clone(&contract))?;
    let ctx = AppContext {
        store: Arc::new(user_store()),
    };

    let server = HttpRpcServer::builder(Dispatcher::new(router), ctx)
        .bind_address("127.0.0.1:3000".parse()?)
        .build();
    server.run().await?;
    Ok(())
}
