//! Deck repository
//!
//! - list: LEFT JOIN with card count (no N+1)
//! - delete: refused while the deck still holds flashcards

use chrono::{DateTime, Utc};
use dailykit_core::Text;
use sqlx::{FromRow, SqlitePool};

use crate::db::guard::{Dependent, GuardedDelete};
use crate::db::DbError;

const DECK_DELETE: GuardedDelete = GuardedDelete {
    resource: "deck",
    table: "decks",
    dependents: &[Dependent {
        child: "flashcards",
        table: "flashcards",
        column: "deck_id",
    }],
};

#[derive(Debug, Clone, FromRow)]
pub struct Deck {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Deck with card count for list display
#[derive(Debug, Clone, FromRow)]
pub struct DeckWithCount {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub card_count: i64,
}

/// Deck repository
pub struct DeckRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DeckRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, name: Text, description: Option<Text>) -> Result<Deck, DbError> {
        let deck: Deck = sqlx::query_as(
            r#"
            INSERT INTO decks (name, description, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(name.as_str())
        .bind(description.as_ref().map(Text::as_str))
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        tracing::debug!(id = deck.id, "deck created");
        Ok(deck)
    }

    /// Decks with card counts, newest first.
    pub async fn list(&self) -> Result<Vec<DeckWithCount>, DbError> {
        let decks = sqlx::query_as(
            r#"
            SELECT
                d.id,
                d.name,
                d.description,
                d.created_at,
                d.updated_at,
                COUNT(f.id) AS card_count
            FROM decks d
            LEFT JOIN flashcards f ON f.deck_id = d.id
            GROUP BY d.id, d.name, d.description, d.created_at, d.updated_at
            ORDER BY d.created_at DESC, d.id DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(decks)
    }

    pub async fn get(&self, id: i64) -> Result<Deck, DbError> {
        sqlx::query_as(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM decks
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("deck", id))
    }

    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        DECK_DELETE.delete(self.pool, id).await
    }
}
