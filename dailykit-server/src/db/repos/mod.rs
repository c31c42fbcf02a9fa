//! Repository implementations for database access
//!
//! One repository per table family. Each method is a single handler's worth
//! of SQL:
//! - writes rely on SQLite for unique and foreign-key checks
//! - lists take an explicit [`Limit`](dailykit_core::Limit)
//! - read-modify-write runs in a transaction

pub mod budgets;
pub mod categories;
pub mod decks;
pub mod flashcards;
pub mod mood;
pub mod progress;
pub mod transactions;

pub use budgets::{Budget, BudgetRepo, NewBudget};
pub use categories::{Category, CategoryPatch, CategoryRepo, CategorySummary, NewCategory};
pub use decks::{Deck, DeckRepo, DeckWithCount};
pub use flashcards::{DueFlashcard, Flashcard, FlashcardRepo, NewFlashcard};
pub use mood::{MoodEntry, MoodEntryPatch, MoodFilter, MoodRepo, MoodStats, NewMoodEntry};
pub use progress::{Progress, ProgressRepo};
pub use transactions::{
    NewTransaction, Transaction, TransactionFilter, TransactionPatch, TransactionRepo,
};

use dailykit_core::Amount;

use super::DbError;

/// Parse a fixed-precision text column (amounts, ease factors) into `f64`.
pub(crate) fn parse_decimal(column: &'static str, value: String) -> Result<f64, DbError> {
    Amount::parse_stored(&value).ok_or(DbError::Corrupt { column, value })
}
