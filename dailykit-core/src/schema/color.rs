//! Category color validation
//!
//! Format: `#rrggbb`, stored lowercase

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Color used when the caller omits one.
pub const DEFAULT_COLOR: &str = "#6b7280";

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("invalid color regex"));

/// Validated hex color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Color(String);

impl Color {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "color" });
        }
        if !HEX_COLOR_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "color",
                reason: "must be a hex color like #1a2b3c",
            });
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self(DEFAULT_COLOR.to_owned())
    }
}
