//! Free-text fields (names, descriptions, card faces)

use super::ValidationError;

/// Trimmed, non-empty text with a per-field length cap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Text(String);

impl Text {
    /// Default cap for short labels such as names.
    pub const NAME_MAX: usize = 100;

    /// Cap for longer bodies (descriptions, notes, card faces).
    pub const BODY_MAX: usize = 2000;

    /// Validate `s` for `field`, trimming surrounding whitespace.
    ///
    /// Length is counted in characters, not bytes.
    pub fn new(field: &'static str, s: &str, max: usize) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field });
        }
        if trimmed.chars().count() > max {
            return Err(ValidationError::TooLong { field, max });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Validate an optional field. Blank strings collapse to `None`.
    pub fn optional(
        field: &'static str,
        s: Option<&str>,
        max: usize,
    ) -> Result<Option<Self>, ValidationError> {
        match s {
            Some(s) if !s.trim().is_empty() => Self::new(field, s, max).map(Some),
            _ => Ok(None),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
