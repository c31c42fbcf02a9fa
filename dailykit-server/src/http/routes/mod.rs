//! Procedures organized by resource
//!
//! Every handler is mounted at `POST /rpc/<procedureName>` and takes its
//! input as a JSON body through [`RpcInput`](super::extractors::RpcInput).

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub mod budgets;
pub mod categories;
pub mod decks;
pub mod flashcards;
pub mod health;
pub mod mood;
pub mod transactions;

/// Response of every delete procedure
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub const OK: Self = Self { success: true };
}

/// Input naming a single row
#[derive(Debug, Deserialize)]
pub struct IdRequest {
    pub id: i64,
}

/// RFC 3339 with millisecond precision and a `Z` suffix
pub(crate) fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
