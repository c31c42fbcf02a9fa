//! Transaction repository
//!
//! Amounts are stored as fixed-precision text and parsed to `f64` on read.
//! Lists are ordered by `transaction_date` descending, newest id first on
//! ties, with both date bounds inclusive.

use chrono::{DateTime, NaiveDate, Utc};
use dailykit_core::{Amount, DateRange, Limit, Text, TransactionKind};
use sqlx::{FromRow, SqlitePool};

use super::parse_decimal;
use crate::db::guard::delete_by_id;
use crate::db::DbError;

/// Transaction as returned to handlers
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub category_id: i64,
    pub amount: f64,
    pub description: Option<String>,
    pub kind: TransactionKind,
    pub transaction_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw row; `amount` and `kind` are still text
#[derive(FromRow)]
struct TransactionRow {
    id: i64,
    category_id: i64,
    amount: String,
    description: Option<String>,
    kind: String,
    transaction_date: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = DbError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let kind = TransactionKind::parse(&row.kind).map_err(|_| DbError::Corrupt {
            column: "kind",
            value: row.kind.clone(),
        })?;
        Ok(Self {
            id: row.id,
            category_id: row.category_id,
            amount: parse_decimal("amount", row.amount)?,
            description: row.description,
            kind,
            transaction_date: row.transaction_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub category_id: i64,
    pub amount: Amount,
    pub description: Option<Text>,
    pub kind: TransactionKind,
    pub transaction_date: NaiveDate,
}

/// Fields to change; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub category_id: Option<i64>,
    pub amount: Option<Amount>,
    pub description: Option<Text>,
    pub kind: Option<TransactionKind>,
    pub transaction_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct TransactionFilter {
    pub category_id: Option<i64>,
    pub kind: Option<TransactionKind>,
    pub range: DateRange,
    pub limit: Limit,
}

const COLUMNS: &str =
    "id, category_id, amount, description, kind, transaction_date, created_at, updated_at";

/// Transaction repository
pub struct TransactionRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TransactionRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a transaction. An unknown category fails with the driver's
    /// foreign-key violation.
    pub async fn create(&self, input: NewTransaction) -> Result<Transaction, DbError> {
        let sql = format!(
            r#"
            INSERT INTO transactions
                (category_id, amount, description, kind, transaction_date, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            RETURNING {COLUMNS}
            "#
        );
        let row: TransactionRow = sqlx::query_as(&sql)
            .bind(input.category_id)
            .bind(input.amount.to_stored())
            .bind(input.description.as_ref().map(Text::as_str))
            .bind(input.kind.as_str())
            .bind(input.transaction_date)
            .bind(Utc::now())
            .fetch_one(self.pool)
            .await?;

        tracing::debug!(id = row.id, category_id = row.category_id, "transaction created");
        row.try_into()
    }

    pub async fn get(&self, id: i64) -> Result<Transaction, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM transactions WHERE id = ?");
        let row: TransactionRow = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("transaction", id))?;
        row.try_into()
    }

    /// Filtered list, newest first.
    pub async fn list(&self, filter: TransactionFilter) -> Result<Vec<Transaction>, DbError> {
        let sql = format!(
            r#"
            SELECT {COLUMNS}
            FROM transactions
            WHERE (?1 IS NULL OR category_id = ?1)
              AND (?2 IS NULL OR kind = ?2)
              AND (?3 IS NULL OR transaction_date >= ?3)
              AND (?4 IS NULL OR transaction_date <= ?4)
            ORDER BY transaction_date DESC, id DESC
            LIMIT ?5
            "#
        );
        let rows: Vec<TransactionRow> = sqlx::query_as(&sql)
            .bind(filter.category_id)
            .bind(filter.kind.map(|k| k.as_str()))
            .bind(filter.range.start())
            .bind(filter.range.end())
            .bind(filter.limit.as_i64())
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(Transaction::try_from).collect()
    }

    pub async fn update(&self, id: i64, patch: TransactionPatch) -> Result<Transaction, DbError> {
        let sql = format!(
            r#"
            UPDATE transactions
            SET category_id = COALESCE(?1, category_id),
                amount = COALESCE(?2, amount),
                description = COALESCE(?3, description),
                kind = COALESCE(?4, kind),
                transaction_date = COALESCE(?5, transaction_date),
                updated_at = ?6
            WHERE id = ?7
            RETURNING {COLUMNS}
            "#
        );
        let row: TransactionRow = sqlx::query_as(&sql)
            .bind(patch.category_id)
            .bind(patch.amount.map(|a| a.to_stored()))
            .bind(patch.description.as_ref().map(Text::as_str))
            .bind(patch.kind.map(|k| k.as_str()))
            .bind(patch.transaction_date)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("transaction", id))?;
        row.try_into()
    }

    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        delete_by_id(self.pool, "transaction", "transactions", id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::test_support;
    use crate::db::repos::{CategoryRepo, NewCategory};
    use dailykit_core::schema::limit::DEFAULT_LIST_LIMIT;
    use dailykit_core::Color;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    async fn category(pool: &SqlitePool, name: &str) -> i64 {
        CategoryRepo::new(pool)
            .create(NewCategory {
                name: Text::new("name", name, Text::NAME_MAX).unwrap(),
                color: Color::default(),
            })
            .await
            .unwrap()
            .id
    }

    fn expense(category_id: i64, amount: f64, date: NaiveDate) -> NewTransaction {
        NewTransaction {
            category_id,
            amount: Amount::new(amount).unwrap(),
            description: None,
            kind: TransactionKind::Expense,
            transaction_date: date,
        }
    }

    fn filter(range: DateRange, limit: Option<u32>) -> TransactionFilter {
        TransactionFilter {
            category_id: None,
            kind: None,
            range,
            limit: Limit::resolve(limit, DEFAULT_LIST_LIMIT),
        }
    }

    #[tokio::test]
    async fn amount_round_trips_through_text() {
        let pool = test_support::pool().await;
        let cat = category(&pool, "Food").await;
        let repo = TransactionRepo::new(&pool);

        let tx = repo.create(expense(cat, 12.5, day(1))).await.unwrap();
        assert_eq!(tx.amount, 12.5);

        let (stored,): (String,) = sqlx::query_as("SELECT amount FROM transactions WHERE id = ?")
            .bind(tx.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(stored, "12.50");
    }

    #[tokio::test]
    async fn unknown_category_is_foreign_key_violation() {
        let pool = test_support::pool().await;
        let err = TransactionRepo::new(&pool)
            .create(expense(404, 1.0, day(1)))
            .await
            .unwrap_err();

        match err {
            DbError::Sqlx(sqlx::Error::Database(e)) => assert!(e.is_foreign_key_violation()),
            other => panic!("expected foreign key violation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn list_orders_newest_first_with_default_limit() {
        let pool = test_support::pool().await;
        let cat = category(&pool, "Food").await;
        let repo = TransactionRepo::new(&pool);

        for d in 1..=25 {
            repo.create(expense(cat, f64::from(d), day(d))).await.unwrap();
        }

        let listed = repo.list(filter(DateRange::default(), None)).await.unwrap();
        assert_eq!(listed.len(), 20);
        assert_eq!(listed[0].transaction_date, day(25));
        assert!(listed
            .windows(2)
            .all(|w| w[0].transaction_date >= w[1].transaction_date));
    }

    #[tokio::test]
    async fn single_day_range_is_inclusive() {
        let pool = test_support::pool().await;
        let cat = category(&pool, "Food").await;
        let repo = TransactionRepo::new(&pool);

        repo.create(expense(cat, 1.0, day(9))).await.unwrap();
        repo.create(expense(cat, 2.0, day(10))).await.unwrap();
        repo.create(expense(cat, 3.0, day(10))).await.unwrap();
        repo.create(expense(cat, 4.0, day(11))).await.unwrap();

        let range = DateRange::new(Some(day(10)), Some(day(10))).unwrap();
        let listed = repo.list(filter(range, None)).await.unwrap();

        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|t| t.transaction_date == day(10)));
        // same date: higher id first
        assert_eq!(listed[0].amount, 3.0);
    }

    #[tokio::test]
    async fn filters_by_category_and_kind() {
        let pool = test_support::pool().await;
        let food = category(&pool, "Food").await;
        let pay = category(&pool, "Pay").await;
        let repo = TransactionRepo::new(&pool);

        repo.create(expense(food, 5.0, day(1))).await.unwrap();
        repo.create(NewTransaction {
            kind: TransactionKind::Income,
            ..expense(pay, 100.0, day(1))
        })
        .await
        .unwrap();

        let mut f = filter(DateRange::default(), None);
        f.kind = Some(TransactionKind::Income);
        let income = repo.list(f).await.unwrap();
        assert_eq!(income.len(), 1);
        assert_eq!(income[0].category_id, pay);

        let mut f = filter(DateRange::default(), Some(1));
        f.category_id = Some(food);
        let food_only = repo.list(f).await.unwrap();
        assert_eq!(food_only.len(), 1);
        assert_eq!(food_only[0].kind, TransactionKind::Expense);
    }

    #[tokio::test]
    async fn update_and_delete() {
        let pool = test_support::pool().await;
        let cat = category(&pool, "Food").await;
        let repo = TransactionRepo::new(&pool);
        let tx = repo.create(expense(cat, 5.0, day(1))).await.unwrap();

        let updated = repo
            .update(
                tx.id,
                TransactionPatch {
                    amount: Some(Amount::new(7.25).unwrap()),
                    description: Some(Text::new("description", "lunch", 100).unwrap()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.amount, 7.25);
        assert_eq!(updated.description.as_deref(), Some("lunch"));
        assert_eq!(updated.transaction_date, day(1));
        assert!(updated.updated_at >= updated.created_at);

        repo.delete(tx.id).await.unwrap();
        assert!(matches!(
            repo.get(tx.id).await.unwrap_err(),
            DbError::NotFound { resource: "transaction", .. }
        ));
        assert!(matches!(
            repo.delete(tx.id).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn update_to_unknown_category_is_rejected() {
        let pool = test_support::pool().await;
        let cat = category(&pool, "Food").await;
        let repo = TransactionRepo::new(&pool);
        let tx = repo.create(expense(cat, 5.0, day(1))).await.unwrap();

        let err = repo
            .update(
                tx.id,
                TransactionPatch {
                    category_id: Some(999),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(
            err.constraint_kind(),
            Some(sqlx::error::ErrorKind::ForeignKeyViolation)
        );
    }
}
