//! Currency amounts
//!
//! Amounts are held as integer cents so the stored text form is exact.
//! The database column is fixed-precision text (`"12.50"`); handlers parse it
//! back to `f64` at the boundary.

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Largest accepted amount in cents (one trillion units).
const MAX_CENTS: i64 = 100_000_000_000_000;

/// A strictly positive amount with at most two fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount {
    cents: i64,
}

impl Amount {
    /// Validate a caller-supplied amount.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::InvalidFormat {
                field: "amount",
                reason: "must be a finite number",
            });
        }
        let scaled = value * 100.0;
        let cents = scaled.round();
        if (scaled - cents).abs() > 1e-6 {
            return Err(ValidationError::InvalidFormat {
                field: "amount",
                reason: "must have at most two decimal places",
            });
        }
        if cents < 1.0 || cents > MAX_CENTS as f64 {
            return Err(ValidationError::InvalidFormat {
                field: "amount",
                reason: "must be greater than zero and at most 1000000000000",
            });
        }
        Ok(Self {
            cents: cents as i64,
        })
    }

    /// Fixed-precision text for storage.
    pub fn to_stored(&self) -> String {
        format!("{}.{:02}", self.cents / 100, self.cents % 100)
    }

    /// Parse a stored column value back to a float.
    ///
    /// Returns `None` when the column does not hold a number.
    pub fn parse_stored(s: &str) -> Option<f64> {
        s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(ValidationError::InvalidVariant {
                field: "kind",
                value: other.to_owned(),
            }),
        }
    }
}
