//! RPC transport
//!
//! Axum server with:
//! - one `POST /rpc/<procedure>` route per handler
//! - CORS (localhost only by default)
//! - request tracing and graceful shutdown
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
