//! savectl-server: HTTP API for restaurant saves and boards
//!
//! - [`db`]: PostgreSQL pool, schema migrations and [`PgBoardStore`]
//! - [`http`]: axum router over any [`BoardStore`](savectl_core::BoardStore)
//!
//! Without a database the server runs over the in-memory store from
//! savectl-core, which enforces the same unique constraints.

pub mod db;
pub mod http;

pub use db::{create_pool, create_pool_with_options, PgBoardStore};
pub use http::{router, run_server, ApiError, AppState, ServerConfig, ServerError};
