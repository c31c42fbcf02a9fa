//! Transaction procedures

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use chrono::NaiveDate;
use dailykit_core::schema::limit::DEFAULT_LIST_LIMIT;
use dailykit_core::{Amount, DateRange, Limit, Text, TransactionKind};
use serde::{Deserialize, Serialize};

use super::{timestamp, IdRequest, SuccessResponse};
use crate::db::repos::{
    NewTransaction, Transaction, TransactionFilter, TransactionPatch, TransactionRepo,
};
use crate::http::error::ApiError;
use crate::http::extractors::RpcInput;
use crate::http::server::AppState;

#[derive(Deserialize)]
pub struct CreateTransactionRequest {
    pub category_id: i64,
    pub amount: f64,
    pub description: Option<String>,
    pub kind: String,
    pub transaction_date: NaiveDate,
}

#[derive(Deserialize)]
pub struct UpdateTransactionRequest {
    pub id: i64,
    pub category_id: Option<i64>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub kind: Option<String>,
    pub transaction_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct GetTransactionsRequest {
    pub category_id: Option<i64>,
    pub kind: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: i64,
    pub category_id: i64,
    pub amount: f64,
    pub description: Option<String>,
    pub kind: TransactionKind,
    pub transaction_date: NaiveDate,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Transaction> for TransactionResponse {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id,
            category_id: t.category_id,
            amount: t.amount,
            description: t.description,
            kind: t.kind,
            transaction_date: t.transaction_date,
            created_at: timestamp(t.created_at),
            updated_at: timestamp(t.updated_at),
        }
    }
}

fn description(raw: Option<&str>) -> Result<Option<Text>, ApiError> {
    Ok(Text::optional("description", raw, Text::BODY_MAX)?)
}

fn kind(raw: Option<&str>) -> Result<Option<TransactionKind>, ApiError> {
    Ok(raw.map(TransactionKind::parse).transpose()?)
}

/// POST /rpc/createTransaction
async fn create_transaction(
    State(state): State<Arc<AppState>>,
    RpcInput(req): RpcInput<CreateTransactionRequest>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let input = NewTransaction {
        category_id: req.category_id,
        amount: Amount::new(req.amount)?,
        description: description(req.description.as_deref())?,
        kind: TransactionKind::parse(&req.kind)?,
        transaction_date: req.transaction_date,
    };
    let tx = TransactionRepo::new(&state.pool).create(input).await?;
    Ok(Json(tx.into()))
}

/// POST /rpc/getTransactions
async fn get_transactions(
    State(state): State<Arc<AppState>>,
    RpcInput(req): RpcInput<GetTransactionsRequest>,
) -> Result<Json<Vec<TransactionResponse>>, ApiError> {
    let filter = TransactionFilter {
        category_id: req.category_id,
        kind: kind(req.kind.as_deref())?,
        range: DateRange::new(req.start_date, req.end_date)?,
        limit: Limit::resolve(req.limit, DEFAULT_LIST_LIMIT),
    };
    let rows = TransactionRepo::new(&state.pool).list(filter).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// POST /rpc/updateTransaction
async fn update_transaction(
    State(state): State<Arc<AppState>>,
    RpcInput(req): RpcInput<UpdateTransactionRequest>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let patch = TransactionPatch {
        category_id: req.category_id,
        amount: req.amount.map(Amount::new).transpose()?,
        description: description(req.description.as_deref())?,
        kind: kind(req.kind.as_deref())?,
        transaction_date: req.transaction_date,
    };
    let tx = TransactionRepo::new(&state.pool).update(req.id, patch).await?;
    Ok(Json(tx.into()))
}

/// POST /rpc/deleteTransaction
async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    RpcInput(req): RpcInput<IdRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    TransactionRepo::new(&state.pool).delete(req.id).await?;
    Ok(Json(SuccessResponse::OK))
}

/// Transaction routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rpc/createTransaction", post(create_transaction))
        .route("/rpc/getTransactions", post(get_transactions))
        .route("/rpc/updateTransaction", post(update_transaction))
        .route("/rpc/deleteTransaction", post(delete_transaction))
}
