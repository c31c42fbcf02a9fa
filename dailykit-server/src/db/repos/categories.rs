//! Category repository
//!
//! Categories are the parent of transactions and budgets. Deleting one is
//! guarded: transactions are checked first, then budgets.

use chrono::{DateTime, Utc};
use dailykit_core::{Color, DateRange, Text};
use sqlx::{FromRow, Row, SqlitePool};

use crate::db::guard::{Dependent, GuardedDelete};
use crate::db::DbError;

const CATEGORY_DELETE: GuardedDelete = GuardedDelete {
    resource: "category",
    table: "categories",
    dependents: &[
        Dependent {
            child: "transactions",
            table: "transactions",
            column: "category_id",
        },
        Dependent {
            child: "budgets",
            table: "budgets",
            column: "category_id",
        },
    ],
};

/// Category record from database
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: Text,
    pub color: Color,
}

/// Fields to change; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<Text>,
    pub color: Option<Color>,
}

/// Per-category totals over a date range
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub category_id: i64,
    pub name: String,
    pub color: String,
    pub income: f64,
    pub expense: f64,
    pub transaction_count: i64,
}

/// Category repository
pub struct CategoryRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CategoryRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a category. Duplicate names fail with the driver's unique
    /// violation.
    pub async fn create(&self, input: NewCategory) -> Result<Category, DbError> {
        let now = Utc::now();
        let category: Category = sqlx::query_as(
            r#"
            INSERT INTO categories (name, color, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            RETURNING id, name, color, created_at, updated_at
            "#,
        )
        .bind(input.name.as_str())
        .bind(input.color.as_str())
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        tracing::debug!(id = category.id, "category created");
        Ok(category)
    }

    /// All categories ordered by name.
    pub async fn list(&self) -> Result<Vec<Category>, DbError> {
        let categories = sqlx::query_as(
            r#"
            SELECT id, name, color, created_at, updated_at
            FROM categories
            ORDER BY name ASC, id ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn get(&self, id: i64) -> Result<Category, DbError> {
        sqlx::query_as(
            r#"
            SELECT id, name, color, created_at, updated_at
            FROM categories
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("category", id))
    }

    pub async fn update(&self, id: i64, patch: CategoryPatch) -> Result<Category, DbError> {
        sqlx::query_as(
            r#"
            UPDATE categories
            SET name = COALESCE(?1, name),
                color = COALESCE(?2, color),
                updated_at = ?3
            WHERE id = ?4
            RETURNING id, name, color, created_at, updated_at
            "#,
        )
        .bind(patch.name.as_ref().map(Text::as_str))
        .bind(patch.color.as_ref().map(Color::as_str))
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("category", id))
    }

    /// Delete a category that has no transactions and no budgets.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        CATEGORY_DELETE.delete(self.pool, id).await
    }

    /// Income and expense totals per category within `range`.
    ///
    /// Every category is listed, including those with no transactions.
    /// Sums are computed in integer cents.
    pub async fn summary(&self, range: DateRange) -> Result<Vec<CategorySummary>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT
                c.id,
                c.name,
                c.color,
                COALESCE(SUM(CASE WHEN t.kind = 'income'
                    THEN CAST(ROUND(CAST(t.amount AS REAL) * 100) AS INTEGER) END), 0) AS income_cents,
                COALESCE(SUM(CASE WHEN t.kind = 'expense'
                    THEN CAST(ROUND(CAST(t.amount AS REAL) * 100) AS INTEGER) END), 0) AS expense_cents,
                COUNT(t.id) AS transaction_count
            FROM categories c
            LEFT JOIN transactions t
                ON t.category_id = c.id
                AND (?1 IS NULL OR t.transaction_date >= ?1)
                AND (?2 IS NULL OR t.transaction_date <= ?2)
            GROUP BY c.id, c.name, c.color
            ORDER BY c.name ASC, c.id ASC
            "#,
        )
        .bind(range.start())
        .bind(range.end())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|r| -> Result<CategorySummary, DbError> {
                let income: i64 = r.try_get("income_cents")?;
                let expense: i64 = r.try_get("expense_cents")?;
                Ok(CategorySummary {
                    category_id: r.try_get("id")?,
                    name: r.try_get("name")?,
                    color: r.try_get("color")?,
                    income: income as f64 / 100.0,
                    expense: expense as f64 / 100.0,
                    transaction_count: r.try_get("transaction_count")?,
                })
            })
            .collect()
    }
}
