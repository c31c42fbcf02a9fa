//! Validated input types
//!
//! Every handler input is parsed into these types before it reaches a
//! repository. Invalid input returns [`ValidationError`], never a panic.

pub mod color;
pub mod limit;
pub mod money;
pub mod month;
pub mod range;
pub mod score;
pub mod text;
pub mod validation;

pub use color::Color;
pub use limit::Limit;
pub use money::{Amount, TransactionKind};
pub use month::BudgetMonth;
pub use range::DateRange;
pub use score::Score;
pub use text::Text;
pub use validation::ValidationError;
