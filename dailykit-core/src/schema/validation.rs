//! Validation error types

use std::fmt;

/// Validation error for schema types
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format (e.g., hex color)
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },

    /// Numeric value outside the accepted bounds
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    /// Invalid enum variant
    InvalidVariant { field: &'static str, value: String },

    /// Two fields that must be ordered are not
    InvertedRange {
        start: &'static str,
        end: &'static str,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
            Self::OutOfRange { field, min, max } => {
                write!(f, "{} must be between {} and {}", field, min, max)
            }
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
            Self::InvertedRange { start, end } => {
                write!(f, "{} must not be after {}", start, end)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
