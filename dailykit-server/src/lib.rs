//! dailykit-server: typed RPC server over SQLite
//!
//! Every procedure is one handler: it validates its input into
//! `dailykit-core` schema types, runs one or two statements through a
//! repository in [`db::repos`], and maps the rows to a JSON response.

pub mod db;
pub mod http;

pub use db::{create_memory_pool, create_pool, DbError};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig};
