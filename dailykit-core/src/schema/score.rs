//! Bounded integer ratings (mood, energy)

use super::ValidationError;

const MIN_SCORE: i64 = 1;
const MAX_SCORE: i64 = 10;

/// Integer rating in `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score(i64);

impl Score {
    pub fn new(field: &'static str, value: i64) -> Result<Self, ValidationError> {
        if !(MIN_SCORE..=MAX_SCORE).contains(&value) {
            return Err(ValidationError::OutOfRange {
                field,
                min: MIN_SCORE,
                max: MAX_SCORE,
            });
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
