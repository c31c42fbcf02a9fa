//! Spaced-repetition progress repository
//!
//! One row per (user, card). The first answer creates it, later answers
//! update it in place. The interval/ease arithmetic lives in
//! [`dailykit_core::spaced`]; this module only loads the previous state and
//! upserts the next one.

use chrono::{DateTime, Utc};
use dailykit_core::spaced::{next_review, ReviewState};
use sqlx::{FromRow, SqlitePool};

use super::parse_decimal;
use crate::db::DbError;

#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub id: i64,
    pub user_id: String,
    pub flashcard_id: i64,
    pub correct_count: i64,
    pub incorrect_count: i64,
    pub interval_days: i64,
    pub ease_factor: f64,
    pub last_reviewed_at: DateTime<Utc>,
    pub next_review_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct ProgressRow {
    id: i64,
    user_id: String,
    flashcard_id: i64,
    correct_count: i64,
    incorrect_count: i64,
    interval_days: i64,
    ease_factor: String,
    last_reviewed_at: DateTime<Utc>,
    next_review_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProgressRow> for Progress {
    type Error = DbError;

    fn try_from(row: ProgressRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            flashcard_id: row.flashcard_id,
            correct_count: row.correct_count,
            incorrect_count: row.incorrect_count,
            interval_days: row.interval_days,
            ease_factor: parse_decimal("ease_factor", row.ease_factor)?,
            last_reviewed_at: row.last_reviewed_at,
            next_review_date: row.next_review_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const COLUMNS: &str = "id, user_id, flashcard_id, correct_count, incorrect_count, interval_days, \
     ease_factor, last_reviewed_at, next_review_date, created_at, updated_at";

/// Progress repository
pub struct ProgressRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProgressRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, user_id: &str, flashcard_id: i64) -> Result<Option<Progress>, DbError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM flashcard_progress WHERE user_id = ?1 AND flashcard_id = ?2"
        );
        let row: Option<ProgressRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .bind(flashcard_id)
            .fetch_optional(self.pool)
            .await?;

        row.map(Progress::try_from).transpose()
    }

    /// Apply one answer at `now` and persist the result.
    ///
    /// The read of the previous state and the upsert share a transaction.
    /// An unknown `flashcard_id` fails with the driver's foreign-key
    /// violation, unchanged.
    pub async fn record_answer(
        &self,
        user_id: &str,
        flashcard_id: i64,
        is_correct: bool,
        now: DateTime<Utc>,
    ) -> Result<Progress, DbError> {
        let mut tx = self.pool.begin().await?;

        let previous: Option<(i64, String)> = sqlx::query_as(
            r#"
            SELECT interval_days, ease_factor
            FROM flashcard_progress
            WHERE user_id = ?1 AND flashcard_id = ?2
            "#,
        )
        .bind(user_id)
        .bind(flashcard_id)
        .fetch_optional(&mut *tx)
        .await?;

        let previous = match previous {
            Some((interval_days, ease)) => Some(ReviewState {
                interval_days,
                ease_factor: parse_decimal("ease_factor", ease)?,
            }),
            None => None,
        };

        let outcome = next_review(previous, is_correct, now);
        let (correct, incorrect) = if is_correct { (1_i64, 0_i64) } else { (0, 1) };

        let sql = format!(
            r#"
            INSERT INTO flashcard_progress (
                user_id, flashcard_id, correct_count, incorrect_count, interval_days,
                ease_factor, last_reviewed_at, next_review_date, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?7, ?7)
            ON CONFLICT (user_id, flashcard_id) DO UPDATE
            SET correct_count = correct_count + excluded.correct_count,
                incorrect_count = incorrect_count + excluded.incorrect_count,
                interval_days = excluded.interval_days,
                ease_factor = excluded.ease_factor,
                last_reviewed_at = excluded.last_reviewed_at,
                next_review_date = excluded.next_review_date,
                updated_at = excluded.updated_at
            RETURNING {COLUMNS}
            "#
        );
        let row: ProgressRow = sqlx::query_as(&sql)
            .bind(user_id)
            .bind(flashcard_id)
            .bind(correct)
            .bind(incorrect)
            .bind(outcome.state.interval_days)
            .bind(format!("{:.2}", outcome.state.ease_factor))
            .bind(outcome.reviewed_at)
            .bind(outcome.next_review_date)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            user_id,
            flashcard_id,
            is_correct,
            interval_days = outcome.state.interval_days,
            "answer recorded"
        );
        row.try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::test_support;
    use crate::db::repos::{DeckRepo, FlashcardRepo, NewFlashcard};
    use chrono::{Duration, TimeZone};
    use dailykit_core::Text;

    async fn card(pool: &SqlitePool) -> i64 {
        let text = |s: &str| Text::new("field", s, Text::BODY_MAX).unwrap();
        let deck = DeckRepo::new(pool).create(text("Deck"), None).await.unwrap();
        FlashcardRepo::new(pool)
            .create(NewFlashcard {
                deck_id: deck.id,
                front: text("front"),
                back: text("back"),
            })
            .await
            .unwrap()
            .id
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn first_correct_answer_creates_row() {
        let pool = test_support::pool().await;
        let card = card(&pool).await;

        let p = ProgressRepo::new(&pool)
            .record_answer("u1", card, true, at(1))
            .await
            .unwrap();

        assert_eq!(p.interval_days, 4);
        assert_eq!(p.ease_factor, 2.5);
        assert_eq!(p.correct_count, 1);
        assert_eq!(p.incorrect_count, 0);
        assert_eq!(p.last_reviewed_at, at(1));
        assert_eq!(p.next_review_date, at(1) + Duration::days(4));
    }

    #[tokio::test]
    async fn first_incorrect_answer_creates_row() {
        let pool = test_support::pool().await;
        let card = card(&pool).await;

        let p = ProgressRepo::new(&pool)
            .record_answer("u1", card, false, at(1))
            .await
            .unwrap();

        assert_eq!(p.interval_days, 1);
        assert_eq!(p.ease_factor, 2.3);
        assert_eq!(p.incorrect_count, 1);
        assert_eq!(p.next_review_date, at(2));
    }

    #[tokio::test]
    async fn later_answers_update_in_place() {
        let pool = test_support::pool().await;
        let card = card(&pool).await;
        let repo = ProgressRepo::new(&pool);

        let first = repo.record_answer("u1", card, true, at(1)).await.unwrap();
        let second = repo.record_answer("u1", card, true, at(5)).await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.interval_days, 10);
        assert_eq!(second.ease_factor, 2.5);
        assert_eq!(second.correct_count, 2);
        assert_eq!(second.created_at, first.created_at);

        let third = repo.record_answer("u1", card, false, at(15)).await.unwrap();
        assert_eq!(third.interval_days, 1);
        assert_eq!(third.ease_factor, 2.3);
        assert_eq!(third.correct_count, 2);
        assert_eq!(third.incorrect_count, 1);
        assert_eq!(third.next_review_date, at(16));
        assert!(third.updated_at >= third.created_at);
    }

    #[tokio::test]
    async fn ease_floor_holds_after_repeated_misses() {
        let pool = test_support::pool().await;
        let card = card(&pool).await;
        let repo = ProgressRepo::new(&pool);

        let mut last = None;
        for day in 1..=10 {
            last = Some(repo.record_answer("u1", card, false, at(day)).await.unwrap());
        }
        let last = last.unwrap();
        assert_eq!(last.ease_factor, 1.3);
        assert_eq!(last.incorrect_count, 10);
    }

    #[tokio::test]
    async fn progress_is_per_user() {
        let pool = test_support::pool().await;
        let card = card(&pool).await;
        let repo = ProgressRepo::new(&pool);

        repo.record_answer("u1", card, true, at(1)).await.unwrap();
        assert!(repo.get("u2", card).await.unwrap().is_none());

        let p = repo.get("u1", card).await.unwrap().unwrap();
        assert_eq!(p.correct_count, 1);
    }

    #[tokio::test]
    async fn unknown_flashcard_is_foreign_key_violation() {
        let pool = test_support::pool().await;
        let err = ProgressRepo::new(&pool)
            .record_answer("u1", 12345, true, at(1))
            .await
            .unwrap_err();

        match err {
            DbError::Sqlx(sqlx::Error::Database(e)) => assert!(e.is_foreign_key_violation()),
            other => panic!("expected foreign key violation, got {other:?}"),
        }
    }
}
