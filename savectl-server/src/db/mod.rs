//! Database layer - connection pool, migrations and the PostgreSQL store
//!
//! # Design Principles
//!
//! - Connection pool (max 5 connections by default)
//! - Board lists carry restaurant counts via LEFT JOIN, no N+1 queries
//! - Rely on unique constraints and `ON CONFLICT`, never check-then-insert

pub mod migrations;
pub mod pool;
pub mod store;

pub use pool::{create_pool, create_pool_with_options};
pub use store::PgBoardStore;
