//! Repository error type

use sqlx::error::ErrorKind;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    /// A parent row still has children in a guarded relation.
    #[error("cannot delete {resource} {id}: {count} related {child} exist")]
    HasDependents {
        resource: &'static str,
        id: i64,
        child: &'static str,
        count: i64,
    },

    /// A stored column could not be parsed back into its domain type.
    #[error("corrupt {column} value '{value}'")]
    Corrupt { column: &'static str, value: String },
}

impl DbError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Constraint kind when the driver rejected a write (unique, foreign key,
    /// check, not null). `None` for every other error.
    pub fn constraint_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Sqlx(sqlx::Error::Database(e)) => match e.kind() {
                ErrorKind::Other => None,
                kind => Some(kind),
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependents_message_names_count_and_child() {
        let err = DbError::HasDependents {
            resource: "category",
            id: 7,
            child: "transactions",
            count: 3,
        };
        assert_eq!(
            err.to_string(),
            "cannot delete category 7: 3 related transactions exist"
        );
    }

    #[test]
    fn non_database_errors_have_no_constraint_kind() {
        assert!(DbError::not_found("deck", 1).constraint_kind().is_none());
        assert!(DbError::Sqlx(sqlx::Error::RowNotFound)
            .constraint_kind()
            .is_none());
    }
}
