//! Cascading-delete guard
//!
//! A parent row is only deleted once every guarded child table is empty for
//! it. Children are checked in the order given, and the first non-empty one
//! is reported with its row count.

use sqlx::SqlitePool;

use super::DbError;

/// A child table that blocks deletion of its parent.
#[derive(Debug, Clone, Copy)]
pub struct Dependent {
    /// Plural label used in the error message, e.g. `"transactions"`.
    pub child: &'static str,
    pub table: &'static str,
    /// Foreign-key column in `table` pointing at the parent.
    pub column: &'static str,
}

/// A parent table and the children that guard it.
#[derive(Debug, Clone, Copy)]
pub struct GuardedDelete {
    /// Singular label used in errors, e.g. `"category"`.
    pub resource: &'static str,
    pub table: &'static str,
    pub dependents: &'static [Dependent],
}

impl GuardedDelete {
    /// First guarded child that still references `id`, with its row count.
    pub async fn first_blocking(
        &self,
        pool: &SqlitePool,
        id: i64,
    ) -> Result<Option<(Dependent, i64)>, DbError> {
        for dep in self.dependents {
            // Table and column names are compile-time constants, never input.
            let sql = format!("SELECT COUNT(*) FROM {} WHERE {} = ?", dep.table, dep.column);
            let (count,): (i64,) = sqlx::query_as(&sql).bind(id).fetch_one(pool).await?;
            if count > 0 {
                return Ok(Some((*dep, count)));
            }
        }
        Ok(None)
    }

    /// Delete the parent row after checking every dependent.
    ///
    /// Fails with [`DbError::HasDependents`] for the first blocking child and
    /// [`DbError::NotFound`] when no row has `id`.
    pub async fn delete(&self, pool: &SqlitePool, id: i64) -> Result<(), DbError> {
        if let Some((dep, count)) = self.first_blocking(pool, id).await? {
            tracing::debug!(
                resource = self.resource,
                id,
                child = dep.child,
                count,
                "delete refused"
            );
            return Err(DbError::HasDependents {
                resource: self.resource,
                id,
                child: dep.child,
                count,
            });
        }

        delete_by_id(pool, self.resource, self.table, id).await
    }
}

/// Delete one row by primary key, failing with `NotFound` if nothing matched.
pub async fn delete_by_id(
    pool: &SqlitePool,
    resource: &'static str,
    table: &'static str,
    id: i64,
) -> Result<(), DbError> {
    let sql = format!("DELETE FROM {} WHERE id = ?", table);
    let result = sqlx::query(&sql).bind(id).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found(resource, id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::test_support;
    use crate::db::repos::{
        BudgetRepo, CategoryRepo, NewBudget, NewCategory, NewTransaction, TransactionRepo,
    };
    use chrono::NaiveDate;
    use dailykit_core::{Amount, BudgetMonth, Color, Text, TransactionKind};

    const TRANSACTIONS: Dependent = Dependent {
        child: "transactions",
        table: "transactions",
        column: "category_id",
    };

    const BUDGETS: Dependent = Dependent {
        child: "budgets",
        table: "budgets",
        column: "category_id",
    };

    const TRANSACTIONS_FIRST: GuardedDelete = GuardedDelete {
        resource: "category",
        table: "categories",
        dependents: &[TRANSACTIONS, BUDGETS],
    };

    const BUDGETS_FIRST: GuardedDelete = GuardedDelete {
        resource: "category",
        table: "categories",
        dependents: &[BUDGETS, TRANSACTIONS],
    };

    /// Category with two transactions and one budget.
    async fn category_with_children(pool: &SqlitePool) -> i64 {
        let id = CategoryRepo::new(pool)
            .create(NewCategory {
                name: Text::new("name", "Food", Text::NAME_MAX).unwrap(),
                color: Color::default(),
            })
            .await
            .unwrap()
            .id;

        for day in [1, 2] {
            TransactionRepo::new(pool)
                .create(NewTransaction {
                    category_id: id,
                    amount: Amount::new(5.0).unwrap(),
                    description: None,
                    kind: TransactionKind::Expense,
                    transaction_date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
                })
                .await
                .unwrap();
        }

        BudgetRepo::new(pool)
            .create(NewBudget {
                category_id: id,
                amount: Amount::new(200.0).unwrap(),
                month: BudgetMonth::new("2024-03").unwrap(),
            })
            .await
            .unwrap();

        id
    }

    #[tokio::test]
    async fn first_blocking_follows_declared_order() {
        let pool = test_support::pool().await;
        let id = category_with_children(&pool).await;

        let (dep, count) = TRANSACTIONS_FIRST
            .first_blocking(&pool, id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(dep.child, "transactions");
        assert_eq!(count, 2);

        let (dep, count) = BUDGETS_FIRST.first_blocking(&pool, id).await.unwrap().unwrap();
        assert_eq!(dep.child, "budgets");
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn delete_reports_first_blocking_child() {
        let pool = test_support::pool().await;
        let id = category_with_children(&pool).await;

        let err = BUDGETS_FIRST.delete(&pool, id).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("cannot delete category {id}: 1 related budgets exist")
        );

        // Nothing was removed
        let (left,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(left, 1);
    }

    #[tokio::test]
    async fn unreferenced_parent_is_deleted_once() {
        let pool = test_support::pool().await;
        let id = CategoryRepo::new(&pool)
            .create(NewCategory {
                name: Text::new("name", "Empty", Text::NAME_MAX).unwrap(),
                color: Color::default(),
            })
            .await
            .unwrap()
            .id;

        assert!(TRANSACTIONS_FIRST.first_blocking(&pool, id).await.unwrap().is_none());
        TRANSACTIONS_FIRST.delete(&pool, id).await.unwrap();

        let err = delete_by_id(&pool, "category", "categories", id)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "category", .. }));
    }
}
