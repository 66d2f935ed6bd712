//! # User Service
//!
//! Reference application for the accord RPC core: a user directory with
//! two procedures, `createUser` and `getUsers`. One contract value drives
//! schema validation on the server, handler binding, and the typed client
//! in [`api`].

pub mod api;
pub mod contract;
pub mod handlers;
pub mod model;

pub use api::UserApi;
pub use contract::{contract, insert_user_schema, select_user_schema};
pub use handlers::{AppContext, CreateUser, GetUsers, router, user_store};
pub use model::{NewUser, User, UserStore};
