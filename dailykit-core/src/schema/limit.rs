//! Result-size limits for list handlers

/// Hard ceiling on rows returned by any list handler
pub const MAX_LIMIT: u32 = 100;

/// Default for transaction and flashcard lists
pub const DEFAULT_LIST_LIMIT: u32 = 20;

/// Default for journal-style lists (mood entries)
pub const DEFAULT_JOURNAL_LIMIT: u32 = 30;

/// Row limit applied to a list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit(u32);

impl Limit {
    /// Use `requested` when given, otherwise `default`.
    ///
    /// The result is clamped to `1..=MAX_LIMIT`.
    pub fn resolve(requested: Option<u32>, default: u32) -> Self {
        Self(requested.unwrap_or(default).clamp(1, MAX_LIMIT))
    }

    /// Value for a SQL `LIMIT` bind.
    pub fn as_i64(&self) -> i64 {
        i64::from(self.0)
    }
}
