//! Budget month (`YYYY-MM`)

use chrono::NaiveDate;

use super::ValidationError;

/// Calendar month a budget applies to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct BudgetMonth(String);

impl BudgetMonth {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "month" });
        }
        let valid = s.len() == 7
            && NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d").is_ok();
        if !valid {
            return Err(ValidationError::InvalidFormat {
                field: "month",
                reason: "must be formatted as YYYY-MM",
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
