//! Budget repository
//!
//! One budget per category and month; the pair is unique in the schema.

use chrono::{DateTime, Utc};
use dailykit_core::{Amount, BudgetMonth};
use sqlx::{FromRow, SqlitePool};

use super::parse_decimal;
use crate::db::guard::delete_by_id;
use crate::db::DbError;

#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    pub id: i64,
    pub category_id: i64,
    pub amount: f64,
    pub month: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct BudgetRow {
    id: i64,
    category_id: i64,
    amount: String,
    month: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BudgetRow> for Budget {
    type Error = DbError;

    fn try_from(row: BudgetRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            category_id: row.category_id,
            amount: parse_decimal("amount", row.amount)?,
            month: row.month,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewBudget {
    pub category_id: i64,
    pub amount: Amount,
    pub month: BudgetMonth,
}

/// Budget repository
pub struct BudgetRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BudgetRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a budget. A second budget for the same category and month is a
    /// unique violation; an unknown category is a foreign-key violation.
    pub async fn create(&self, input: NewBudget) -> Result<Budget, DbError> {
        let row: BudgetRow = sqlx::query_as(
            r#"
            INSERT INTO budgets (category_id, amount, month, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            RETURNING id, category_id, amount, month, created_at, updated_at
            "#,
        )
        .bind(input.category_id)
        .bind(input.amount.to_stored())
        .bind(input.month.as_str())
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Budgets, newest month first. `month` narrows to one month.
    pub async fn list(&self, month: Option<&BudgetMonth>) -> Result<Vec<Budget>, DbError> {
        let rows: Vec<BudgetRow> = sqlx::query_as(
            r#"
            SELECT id, category_id, amount, month, created_at, updated_at
            FROM budgets
            WHERE (?1 IS NULL OR month = ?1)
            ORDER BY month DESC, id DESC
            "#,
        )
        .bind(month.map(BudgetMonth::as_str))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Budget::try_from).collect()
    }

    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        delete_by_id(self.pool, "budget", "budgets", id).await
    }
}
