//! Budget procedures

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use dailykit_core::{Amount, BudgetMonth};
use serde::{Deserialize, Serialize};

use super::{timestamp, IdRequest, SuccessResponse};
use crate::db::repos::{Budget, BudgetRepo, NewBudget};
use crate::http::error::ApiError;
use crate::http::extractors::RpcInput;
use crate::http::server::AppState;

#[derive(Deserialize)]
pub struct CreateBudgetRequest {
    pub category_id: i64,
    pub amount: f64,
    pub month: String,
}

#[derive(Deserialize)]
pub struct GetBudgetsRequest {
    pub month: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BudgetResponse {
    pub id: i64,
    pub category_id: i64,
    pub amount: f64,
    pub month: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Budget> for BudgetResponse {
    fn from(b: Budget) -> Self {
        Self {
            id: b.id,
            category_id: b.category_id,
            amount: b.amount,
            month: b.month,
            created_at: timestamp(b.created_at),
            updated_at: timestamp(b.updated_at),
        }
    }
}

/// POST /rpc/createBudget
async fn create_budget(
    State(state): State<Arc<AppState>>,
    RpcInput(req): RpcInput<CreateBudgetRequest>,
) -> Result<Json<BudgetResponse>, ApiError> {
    let input = NewBudget {
        category_id: req.category_id,
        amount: Amount::new(req.amount)?,
        month: BudgetMonth::new(&req.month)?,
    };
    let budget = BudgetRepo::new(&state.pool).create(input).await?;
    Ok(Json(budget.into()))
}

/// POST /rpc/getBudgets
async fn get_budgets(
    State(state): State<Arc<AppState>>,
    RpcInput(req): RpcInput<GetBudgetsRequest>,
) -> Result<Json<Vec<BudgetResponse>>, ApiError> {
    let month = req.month.as_deref().map(BudgetMonth::new).transpose()?;
    let budgets = BudgetRepo::new(&state.pool).list(month.as_ref()).await?;
    Ok(Json(budgets.into_iter().map(Into::into).collect()))
}

/// POST /rpc/deleteBudget
async fn delete_budget(
    State(state): State<Arc<AppState>>,
    RpcInput(req): RpcInput<IdRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    BudgetRepo::new(&state.pool).delete(req.id).await?;
    Ok(Json(SuccessResponse::OK))
}

/// Budget routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rpc/createBudget", post(create_budget))
        .route("/rpc/getBudgets", post(get_budgets))
        .route("/rpc/deleteBudget", post(delete_budget))
}
