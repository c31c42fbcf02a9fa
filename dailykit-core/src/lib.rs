//! dailykit-core: schema layer and pure rules shared by every handler.
//!
//! Nothing in this crate touches the database. Inputs are validated into the
//! newtypes in [`schema`] before a handler runs, and the spaced-repetition
//! transition in [`spaced`] is a plain function of the previous state.

pub mod schema;
pub mod spaced;

pub use schema::{
    Amount, BudgetMonth, Color, DateRange, Limit, Score, Text, TransactionKind, ValidationError,
};
pub use spaced::{next_review, ReviewOutcome, ReviewState};
