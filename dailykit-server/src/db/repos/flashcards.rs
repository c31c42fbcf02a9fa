//! Flashcard repository
//!
//! Progress rows reference their card with `ON DELETE CASCADE`, so deleting a
//! card needs no guard.

use chrono::{DateTime, Utc};
use dailykit_core::{Limit, Text};
use sqlx::{FromRow, SqlitePool};

use crate::db::guard::delete_by_id;
use crate::db::DbError;

#[derive(Debug, Clone, FromRow)]
pub struct Flashcard {
    pub id: i64,
    pub deck_id: i64,
    pub front: String,
    pub back: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Card due for review, with the user's scheduled date (`None` if never seen)
#[derive(Debug, Clone, FromRow)]
pub struct DueFlashcard {
    pub id: i64,
    pub deck_id: i64,
    pub front: String,
    pub back: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub next_review_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewFlashcard {
    pub deck_id: i64,
    pub front: Text,
    pub back: Text,
}

/// Flashcard repository
pub struct FlashcardRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FlashcardRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a card. An unknown deck fails with the driver's foreign-key
    /// violation.
    pub async fn create(&self, input: NewFlashcard) -> Result<Flashcard, DbError> {
        let card: Flashcard = sqlx::query_as(
            r#"
            INSERT INTO flashcards (deck_id, front, back, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            RETURNING id, deck_id, front, back, created_at, updated_at
            "#,
        )
        .bind(input.deck_id)
        .bind(input.front.as_str())
        .bind(input.back.as_str())
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        tracing::debug!(id = card.id, deck_id = card.deck_id, "flashcard created");
        Ok(card)
    }

    /// Cards of one deck, newest first.
    pub async fn list_for_deck(&self, deck_id: i64) -> Result<Vec<Flashcard>, DbError> {
        let cards = sqlx::query_as(
            r#"
            SELECT id, deck_id, front, back, created_at, updated_at
            FROM flashcards
            WHERE deck_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(deck_id)
        .fetch_all(self.pool)
        .await?;

        Ok(cards)
    }

    pub async fn get(&self, id: i64) -> Result<Flashcard, DbError> {
        sqlx::query_as(
            r#"
            SELECT id, deck_id, front, back, created_at, updated_at
            FROM flashcards
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("flashcard", id))
    }

    /// Delete a card together with every user's progress on it.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        delete_by_id(self.pool, "flashcard", "flashcards", id).await
    }

    /// Cards the user has never reviewed or whose review date is at or
    /// before `now`.
    ///
    /// Unseen cards come first, then the most overdue.
    pub async fn due_for_user(
        &self,
        user_id: &str,
        deck_id: Option<i64>,
        now: DateTime<Utc>,
        limit: Limit,
    ) -> Result<Vec<DueFlashcard>, DbError> {
        let cards = sqlx::query_as(
            r#"
            SELECT
                f.id,
                f.deck_id,
                f.front,
                f.back,
                f.created_at,
                f.updated_at,
                p.next_review_date
            FROM flashcards f
            LEFT JOIN flashcard_progress p
                ON p.flashcard_id = f.id AND p.user_id = ?1
            WHERE (?2 IS NULL OR f.deck_id = ?2)
              AND (p.id IS NULL OR p.next_review_date <= ?3)
            ORDER BY p.next_review_date ASC, f.id ASC
            LIMIT ?4
            "#,
        )
        .bind(user_id)
        .bind(deck_id)
        .bind(now)
        .bind(limit.as_i64())
        .fetch_all(self.pool)
        .await?;

        Ok(cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::test_support;
    use crate::db::repos::{DeckRepo, ProgressRepo};
    use chrono::{Datelike, Duration, TimeZone};
    use dailykit_core::schema::limit::DEFAULT_LIST_LIMIT;
    use dailykit_core::spaced::MAX_INTERVAL_DAYS;

    fn text(s: &str) -> Text {
        Text::new("field", s, Text::BODY_MAX).unwrap()
    }

    async fn deck(pool: &SqlitePool, name: &str) -> i64 {
        DeckRepo::new(pool).create(text(name), None).await.unwrap().id
    }

    async fn card(pool: &SqlitePool, deck_id: i64, front: &str) -> Flashcard {
        FlashcardRepo::new(pool)
            .create(NewFlashcard {
                deck_id,
                front: text(front),
                back: text("back"),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn unknown_deck_is_foreign_key_violation() {
        let pool = test_support::pool().await;
        let err = FlashcardRepo::new(&pool)
            .create(NewFlashcard {
                deck_id: 42,
                front: text("a"),
                back: text("b"),
            })
            .await
            .unwrap_err();
        assert_eq!(
            err.constraint_kind(),
            Some(sqlx::error::ErrorKind::ForeignKeyViolation)
        );
    }

    #[tokio::test]
    async fn list_is_scoped_to_deck() {
        let pool = test_support::pool().await;
        let a = deck(&pool, "A").await;
        let b = deck(&pool, "B").await;
        card(&pool, a, "one").await;
        let second = card(&pool, a, "two").await;
        card(&pool, b, "other").await;

        let cards = FlashcardRepo::new(&pool).list_for_deck(a).await.unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].id, second.id);
    }

    #[tokio::test]
    async fn delete_cascades_progress() {
        let pool = test_support::pool().await;
        let d = deck(&pool, "A").await;
        let c = card(&pool, d, "one").await;
        ProgressRepo::new(&pool)
            .record_answer("u1", c.id, true, Utc::now())
            .await
            .unwrap();

        FlashcardRepo::new(&pool).delete(c.id).await.unwrap();

        let (left,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM flashcard_progress")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(left, 0);
    }

    #[tokio::test]
    async fn due_cards_include_unseen_and_overdue() {
        let pool = test_support::pool().await;
        let d = deck(&pool, "A").await;
        let unseen = card(&pool, d, "unseen").await;
        let overdue = card(&pool, d, "overdue").await;
        let later = card(&pool, d, "later").await;

        let now = Utc::now();
        let progress = ProgressRepo::new(&pool);
        // First incorrect answer: due one day later
        progress
            .record_answer("u1", overdue.id, false, now - Duration::days(3))
            .await
            .unwrap();
        // First correct answer: due in four days
        progress.record_answer("u1", later.id, true, now).await.unwrap();

        let repo = FlashcardRepo::new(&pool);
        let due = repo
            .due_for_user("u1", Some(d), now, Limit::resolve(None, DEFAULT_LIST_LIMIT))
            .await
            .unwrap();
        let ids: Vec<_> = due.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![unseen.id, overdue.id]);
        assert!(due[0].next_review_date.is_none());

        // Another user has seen nothing
        let other = repo
            .due_for_user("u2", None, now, Limit::resolve(None, DEFAULT_LIST_LIMIT))
            .await
            .unwrap();
        assert_eq!(other.len(), 3);
    }

    #[tokio::test]
    async fn long_correct_streak_is_not_due() {
        let pool = test_support::pool().await;
        let d = deck(&pool, "A").await;
        let c = card(&pool, d, "well known").await;

        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        let progress = ProgressRepo::new(&pool);
        for _ in 0..20 {
            progress.record_answer("u1", c.id, true, now).await.unwrap();
        }

        let p = progress.get("u1", c.id).await.unwrap().unwrap();
        assert_eq!(p.correct_count, 20);
        assert_eq!(p.interval_days, MAX_INTERVAL_DAYS);
        assert!(p.next_review_date.year() <= 9999);

        let due = FlashcardRepo::new(&pool)
            .due_for_user("u1", Some(d), now, Limit::resolve(None, DEFAULT_LIST_LIMIT))
            .await
            .unwrap();
        assert!(due.is_empty());
    }
}
