use thiserror::Error;

/// Unified error type for database operations that application code can handle
#[derive(Error, Debug)]
pub enum DbError {
    /// Entity not found by the given identifier
    #[error("Entity not found")]
    NotFound,

    /// Unique constraint violation
    #[error("Unique constraint violation")]
    UniqueViolation {
        constraint: Option<String>,
        message: String,
    },

    /// Check constraint violation
    #[error("Check constraint violation")]
    CheckViolation {
        constraint: Option<String>,
        message: String,
    },

    /// Catch-all for non-recoverable errors (connection failures, corrupt
    /// database, etc.)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DbError {
    /// Whether this violation names the doctors email uniqueness constraint.
    ///
    /// SQLite does not expose structured constraint metadata the way Postgres
    /// does, so we match on the driver message, which has the stable form
    /// `UNIQUE constraint failed: doctors.email`.
    pub fn is_email_conflict(&self) -> bool {
        match self {
            DbError::UniqueViolation { constraint, message } => {
                constraint.as_deref().is_some_and(|c| c.contains("email"))
                    || message.contains("doctors.email")
            }
            _ => false,
        }
    }
}

/// Convert from sqlx::Error using sqlx's error categorization
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    DbError::UniqueViolation {
                        constraint: db_err.constraint().map(|s| s.to_string()),
                        message: db_err.message().to_string(),
                    }
                } else if db_err.is_check_violation() {
                    DbError::CheckViolation {
                        constraint: db_err.constraint().map(|s| s.to_string()),
                        message: db_err.message().to_string(),
                    }
                } else {
                    // All other database errors are non-recoverable - convert to anyhow
                    DbError::Other(anyhow::Error::from(err))
                }
            }
            // All other sqlx errors are non-recoverable - convert to anyhow
            _ => DbError::Other(anyhow::Error::from(err)),
        }
    }
}

/// Type alias for database operation results
pub type Result<T> = std::result::Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_conflict_detected_from_sqlite_message() {
        let err = DbError::UniqueViolation {
            constraint: None,
            message: "UNIQUE constraint failed: doctors.email".to_string(),
        };
        assert!(err.is_email_conflict());
    }

    #[test]
    fn other_unique_violations_are_not_email_conflicts() {
        let err = DbError::UniqueViolation {
            constraint: None,
            message: "UNIQUE constraint failed: doctors.id".to_string(),
        };
        assert!(!err.is_email_conflict());

        assert!(!DbError::NotFound.is_email_conflict());
    }
}
