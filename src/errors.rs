use crate::db::errors::DbError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use utoipa::ToSchema;

#[derive(ThisError, Debug)]
pub enum Error {
    /// One or more form fields failed validation
    #[error("Validation failed")]
    Validation { errors: Vec<FieldError> },

    /// Email collision on create or update
    #[error("Email already exists: {email}")]
    DuplicateEmail { email: String },

    /// Invalid request data
    #[error("{message}")]
    BadRequest { message: String },

    /// Requested resource not found
    #[error("{resource} not found with ID: {id}")]
    NotFound { resource: String, id: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A single field-level validation failure, surfaced so a form can be
/// re-rendered with the offending field highlighted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Error::DuplicateEmail { .. } => StatusCode::CONFLICT,
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
                DbError::CheckViolation { .. } => StatusCode::BAD_REQUEST,
                // The store being unreachable is the one hard failure with no
                // fallback path
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation { .. } => "Validation failed".to_string(),
            Error::DuplicateEmail { .. } => "Email already exists".to_string(),
            Error::BadRequest { message } => message.clone(),
            Error::NotFound { resource, id } => format!("{resource} not found with ID: {id}"),
            Error::Internal { .. } => "Internal server error".to_string(),
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "Resource not found".to_string(),
                DbError::UniqueViolation { .. } if db_err.is_email_conflict() => {
                    "Email address already exists. Please use a different email.".to_string()
                }
                DbError::UniqueViolation { .. } => "Resource already exists".to_string(),
                DbError::CheckViolation { .. } => "Invalid data provided".to_string(),
                DbError::Other(_) => "Database error occurred".to_string(),
            },
            Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Database(DbError::Other(_)) | Error::Internal { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Database(_) => {
                tracing::warn!("Database constraint error: {}", self);
            }
            Error::DuplicateEmail { .. } => {
                tracing::warn!("Conflict error: {}", self);
            }
            Error::Validation { .. } | Error::BadRequest { .. } | Error::NotFound { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();

        match &self {
            // Field-level detail so the form can be re-rendered with prior
            // input intact
            Error::Validation { errors } => {
                use serde_json::json;
                let body = json!({
                    "message": "Validation failed",
                    "errors": errors,
                });
                (status, axum::response::Json(body)).into_response()
            }
            // Duplicate email rejects the `email` field specifically, whether
            // caught by the service pre-check or by the storage constraint
            Error::DuplicateEmail { .. } => {
                use serde_json::json;
                let body = json!({
                    "message": "Email already exists",
                    "field": "email",
                });
                (status, axum::response::Json(body)).into_response()
            }
            Error::Database(db_err) if db_err.is_email_conflict() => {
                use serde_json::json;
                let body = json!({
                    "message": "Email address already exists. Please use a different email.",
                    "field": "email",
                });
                (status, axum::response::Json(body)).into_response()
            }
            _ => {
                // For all other errors, return a simple text message
                let user_message = self.user_message();
                (status, user_message).into_response()
            }
        }
    }
}

/// Convert raw driver errors at transaction boundaries (begin/commit)
impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::Database(DbError::from(err))
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_taxonomy() {
        let validation = Error::Validation {
            errors: vec![FieldError::new("first_name", "First name is required")],
        };
        assert_eq!(validation.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let duplicate = Error::DuplicateEmail {
            email: "a@x.com".to_string(),
        };
        assert_eq!(duplicate.status_code(), StatusCode::CONFLICT);

        let not_found = Error::NotFound {
            resource: "Doctor".to_string(),
            id: "42".to_string(),
        };
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.user_message(), "Doctor not found with ID: 42");

        let unavailable = Error::Database(DbError::Other(anyhow::anyhow!("connection refused")));
        assert_eq!(unavailable.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unique_violation_on_email_is_a_conflict() {
        let err = Error::Database(DbError::UniqueViolation {
            constraint: None,
            message: "UNIQUE constraint failed: doctors.email".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            err.user_message(),
            "Email address already exists. Please use a different email."
        );
    }
}
