//! Spaced-repetition score update
//!
//! A card's state is its review interval (whole days) and ease factor. Each
//! answer moves the state deterministically:
//!
//! | previous | answer    | interval                  | ease                 |
//! |----------|-----------|---------------------------|----------------------|
//! | none     | correct   | 4                         | 2.5                  |
//! | none     | incorrect | 1                         | 2.3                  |
//! | (i, e)   | correct   | round(i × e)              | e                    |
//! | (i, e)   | incorrect | 1                         | max(1.3, e − 0.2)    |
//!
//! Intervals stop growing at [`MAX_INTERVAL_DAYS`], and review dates never go
//! past the end of year 9999. Timestamps are stored as RFC 3339 text and
//! compared as strings, which only orders correctly for four-digit years.

use chrono::{DateTime, Duration, Utc};

pub const FIRST_CORRECT_INTERVAL_DAYS: i64 = 4;
pub const FIRST_CORRECT_EASE: f64 = 2.5;
pub const FIRST_INCORRECT_INTERVAL_DAYS: i64 = 1;
pub const FIRST_INCORRECT_EASE: f64 = 2.3;
pub const RESET_INTERVAL_DAYS: i64 = 1;
pub const EASE_PENALTY: f64 = 0.2;
pub const MIN_EASE: f64 = 1.3;
/// Upper bound on the review interval (about a century).
pub const MAX_INTERVAL_DAYS: i64 = 36_500;

/// 9999-12-31T23:59:59Z
const LATEST_REVIEW_SECS: i64 = 253_402_300_799;

/// Interval and ease factor after a review.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewState {
    pub interval_days: i64,
    pub ease_factor: f64,
}

/// Result of applying one answer at a given instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewOutcome {
    pub state: ReviewState,
    pub reviewed_at: DateTime<Utc>,
    pub next_review_date: DateTime<Utc>,
}

impl ReviewState {
    /// State after answering, given the state before (if any).
    pub fn advance(previous: Option<ReviewState>, is_correct: bool) -> ReviewState {
        match (previous, is_correct) {
            (None, true) => ReviewState {
                interval_days: FIRST_CORRECT_INTERVAL_DAYS,
                ease_factor: FIRST_CORRECT_EASE,
            },
            (None, false) => ReviewState {
                interval_days: FIRST_INCORRECT_INTERVAL_DAYS,
                ease_factor: FIRST_INCORRECT_EASE,
            },
            (Some(prev), true) => ReviewState {
                interval_days: ((prev.interval_days as f64 * prev.ease_factor).round() as i64)
                    .min(MAX_INTERVAL_DAYS),
                ease_factor: prev.ease_factor,
            },
            (Some(prev), false) => ReviewState {
                interval_days: RESET_INTERVAL_DAYS,
                ease_factor: round_ease((prev.ease_factor - EASE_PENALTY).max(MIN_EASE)),
            },
        }
    }
}

/// Apply one answer at `now`.
///
/// The next review date is clamped to the end of year 9999.
pub fn next_review(
    previous: Option<ReviewState>,
    is_correct: bool,
    now: DateTime<Utc>,
) -> ReviewOutcome {
    let state = ReviewState::advance(previous, is_correct);
    let latest = latest_review_date();
    let next_review_date = Duration::try_days(state.interval_days)
        .and_then(|d| now.checked_add_signed(d))
        .map_or(latest, |d| d.min(latest));

    ReviewOutcome {
        state,
        reviewed_at: now,
        next_review_date,
    }
}

fn latest_review_date() -> DateTime<Utc> {
    DateTime::from_timestamp(LATEST_REVIEW_SECS, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Ease factors are stored with two decimals; keep the in-memory value equal
/// to what a reload would produce.
fn round_ease(e: f64) -> f64 {
    (e * 100.0).round() / 100.0
}
