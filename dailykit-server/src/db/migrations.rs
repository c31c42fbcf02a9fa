//! Schema migrations
//!
//! Every statement is idempotent, so `run` is safe on each start.
//! Timestamps are stored as RFC 3339 text bound from Rust; no column relies
//! on SQL-side defaults for them.

use sqlx::SqlitePool;

const TABLES: &[(&str, &str)] = &[
    (
        "categories",
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            color TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "transactions",
        r#"
        CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category_id INTEGER NOT NULL REFERENCES categories(id),
            amount TEXT NOT NULL,
            description TEXT,
            kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
            transaction_date TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "budgets",
        r#"
        CREATE TABLE IF NOT EXISTS budgets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category_id INTEGER NOT NULL REFERENCES categories(id),
            amount TEXT NOT NULL,
            month TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (category_id, month)
        )
        "#,
    ),
    (
        "decks",
        r#"
        CREATE TABLE IF NOT EXISTS decks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "flashcards",
        r#"
        CREATE TABLE IF NOT EXISTS flashcards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            deck_id INTEGER NOT NULL REFERENCES decks(id),
            front TEXT NOT NULL,
            back TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "flashcard_progress",
        r#"
        CREATE TABLE IF NOT EXISTS flashcard_progress (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            flashcard_id INTEGER NOT NULL REFERENCES flashcards(id) ON DELETE CASCADE,
            correct_count INTEGER NOT NULL DEFAULT 0,
            incorrect_count INTEGER NOT NULL DEFAULT 0,
            interval_days INTEGER NOT NULL,
            ease_factor TEXT NOT NULL,
            last_reviewed_at TEXT NOT NULL,
            next_review_date TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (user_id, flashcard_id)
        )
        "#,
    ),
    (
        "mood_entries",
        r#"
        CREATE TABLE IF NOT EXISTS mood_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            mood_score INTEGER NOT NULL CHECK (mood_score BETWEEN 1 AND 10),
            energy_level INTEGER CHECK (energy_level BETWEEN 1 AND 10),
            notes TEXT,
            recorded_at TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category_id)",
    "CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(transaction_date DESC)",
    "CREATE INDEX IF NOT EXISTS idx_budgets_category ON budgets(category_id)",
    "CREATE INDEX IF NOT EXISTS idx_flashcards_deck ON flashcards(deck_id)",
    "CREATE INDEX IF NOT EXISTS idx_progress_due ON flashcard_progress(user_id, next_review_date)",
    "CREATE INDEX IF NOT EXISTS idx_mood_user_recorded ON mood_entries(user_id, recorded_at DESC)",
];

/// Run all migrations
pub async fn run(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    tracing::info!("Running migrations...");

    for &(table, ddl) in TABLES {
        sqlx::query(ddl).execute(pool).await?;
        tracing::debug!(table, "table ready");
    }

    for &ddl in INDEXES {
        sqlx::query(ddl).execute(pool).await?;
    }

    tracing::info!("Migrations complete");
    Ok(())
}
