//! Category procedures

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use chrono::NaiveDate;
use dailykit_core::{Color, DateRange, Text};
use serde::{Deserialize, Serialize};

use super::{timestamp, IdRequest, SuccessResponse};
use crate::db::repos::{Category, CategoryPatch, CategoryRepo, CategorySummary, NewCategory};
use crate::http::error::ApiError;
use crate::http::extractors::RpcInput;
use crate::http::server::AppState;

#[derive(Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub color: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateCategoryRequest {
    pub id: i64,
    pub name: Option<String>,
    pub color: Option<String>,
}

#[derive(Deserialize)]
pub struct CategorySummaryRequest {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            color: c.color,
            created_at: timestamp(c.created_at),
            updated_at: timestamp(c.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategorySummaryResponse {
    pub category_id: i64,
    pub name: String,
    pub color: String,
    pub income: f64,
    pub expense: f64,
    pub net: f64,
    pub transaction_count: i64,
}

impl From<CategorySummary> for CategorySummaryResponse {
    fn from(s: CategorySummary) -> Self {
        Self {
            category_id: s.category_id,
            name: s.name,
            color: s.color,
            income: s.income,
            expense: s.expense,
            net: ((s.income - s.expense) * 100.0).round() / 100.0,
            transaction_count: s.transaction_count,
        }
    }
}

fn color(raw: Option<&str>) -> Result<Option<Color>, ApiError> {
    Ok(raw.map(Color::new).transpose()?)
}

/// POST /rpc/createCategory
async fn create_category(
    State(state): State<Arc<AppState>>,
    RpcInput(req): RpcInput<CreateCategoryRequest>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let input = NewCategory {
        name: Text::new("name", &req.name, Text::NAME_MAX)?,
        color: color(req.color.as_deref())?.unwrap_or_default(),
    };
    let category = CategoryRepo::new(&state.pool).create(input).await?;
    Ok(Json(category.into()))
}

/// POST /rpc/getCategories
async fn get_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let categories = CategoryRepo::new(&state.pool).list().await?;
    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

/// POST /rpc/updateCategory
async fn update_category(
    State(state): State<Arc<AppState>>,
    RpcInput(req): RpcInput<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let patch = CategoryPatch {
        name: Text::optional("name", req.name.as_deref(), Text::NAME_MAX)?,
        color: color(req.color.as_deref())?,
    };
    let category = CategoryRepo::new(&state.pool).update(req.id, patch).await?;
    Ok(Json(category.into()))
}

/// POST /rpc/deleteCategory - refused while transactions or budgets remain
async fn delete_category(
    State(state): State<Arc<AppState>>,
    RpcInput(req): RpcInput<IdRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    CategoryRepo::new(&state.pool).delete(req.id).await?;
    Ok(Json(SuccessResponse::OK))
}

/// POST /rpc/getCategorySummary
async fn get_category_summary(
    State(state): State<Arc<AppState>>,
    RpcInput(req): RpcInput<CategorySummaryRequest>,
) -> Result<Json<Vec<CategorySummaryResponse>>, ApiError> {
    let range = DateRange::new(req.start_date, req.end_date)?;
    let rows = CategoryRepo::new(&state.pool).summary(range).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// Category routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rpc/createCategory", post(create_category))
        .route("/rpc/getCategories", post(get_categories))
        .route("/rpc/updateCategory", post(update_category))
        .route("/rpc/deleteCategory", post(delete_category))
        .route("/rpc/getCategorySummary", post(get_category_summary))
}
