//! Database layer - connection pool, schema and repositories
//!
//! - One pool per process, handed to handlers through `AppState`
//! - Constraint checks (unique, foreign key) are left to SQLite
//! - Parent deletes go through [`guard`] unless the schema cascades

pub mod error;
pub mod guard;
pub mod migrations;
pub mod pool;
pub mod repos;

pub use error::DbError;
pub use pool::{create_memory_pool, create_pool, create_pool_with_options};
pub use repos::*;
pub use sqlx::SqlitePool;
