//!
//! # Error Handling
//!
//! This module defines `AppError`, the single error type returned by stores, the
//! token service and HTTP handlers. Each variant maps to one HTTP status code and
//! is rendered as a `{"error": "..."}` JSON body.
//!
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error` and `bcrypt::BcryptError` let handlers
//! propagate failures with the `?` operator.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Primary key of the `users` table; its violation means a duplicate email.
const USERS_EMAIL_CONSTRAINT: &str = "users_pkey";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Authentication is missing or the bearer token was rejected (HTTP 401).
    Unauthorized(String),
    /// Malformed request or invalid credentials (HTTP 400).
    BadRequest(String),
    /// A required field is missing or empty (HTTP 400).
    ValidationError(String),
    /// Unknown user email or task (HTTP 404).
    NotFound(String),
    /// The record already exists, e.g. a duplicate registration (HTTP 409).
    Conflict(String),
    /// Any failure of the underlying store (HTTP 500).
    DatabaseError(String),
    /// Unexpected server-side failure (HTTP 500).
    InternalServerError(String),
    /// Invalid or missing process configuration. Only raised at start-up.
    Configuration(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::Configuration(msg) => write!(f, "Configuration Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    fn message(&self) -> &str {
        match self {
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::DatabaseError(msg)
            | AppError::InternalServerError(msg)
            | AppError::Configuration(msg) => msg,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Store details stay in the log, not in the response body.
        let message = match self {
            AppError::DatabaseError(_) => "Database error",
            _ => self.message(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// A unique-constraint violation becomes `Conflict`, so a duplicate insert that
/// slipped past an existence check is still reported as 409. Only the users
/// primary key is reported as a duplicate email. Everything else is a
/// `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        if let Some(db_err) = error.as_database_error() {
            if db_err.is_unique_violation() {
                return match db_err.constraint() {
                    Some(USERS_EMAIL_CONSTRAINT) => AppError::Conflict("Email already exists".into()),
                    Some(constraint) => {
                        AppError::Conflict(format!("Constraint violation: {}", constraint))
                    }
                    None => AppError::Conflict("Record already exists".into()),
                };
            }
        }
        log::error!("store failure: {}", error);
        AppError::DatabaseError(error.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> AppError {
        AppError::DatabaseError(error.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(format!("Invalid token: {}", error))
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(error: actix_web::error::BlockingError) -> AppError {
        AppError::InternalServerError(format!("Blocking task failed: {}", error))
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_responses() {
        let cases = [
            (AppError::Unauthorized("Missing token".into()), 401),
            (AppError::BadRequest("Invalid Credentials".into()), 400),
            (AppError::ValidationError("All fields are required".into()), 400),
            (AppError::NotFound("Task not found".into()), 404),
            (AppError::Conflict("Email already exists".into()), 409),
            (AppError::DatabaseError("connection reset".into()), 500),
            (AppError::InternalServerError("boom".into()), 500),
            (AppError::from(actix_web::error::BlockingError), 500),
        ];

        for (error, expected) in cases {
            assert_eq!(error.error_response().status(), expected, "{}", error);
        }
    }

    #[actix_rt::test]
    async fn test_database_error_hides_details() {
        let error = AppError::DatabaseError("relation \"tasks\" does not exist".into());
        let body = actix_web::body::to_bytes(error.error_response().into_body())
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Database error");
    }

    #[derive(Debug)]
    struct UniqueViolation(Option<&'static str>);

    impl fmt::Display for UniqueViolation {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "duplicate key value violates unique constraint")
        }
    }

    impl std::error::Error for UniqueViolation {}

    impl sqlx::error::DatabaseError for UniqueViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::UniqueViolation
        }

        fn constraint(&self) -> Option<&str> {
            self.0
        }
    }

    fn conflict_message(constraint: Option<&'static str>) -> String {
        let error: AppError = sqlx::Error::Database(Box::new(UniqueViolation(constraint))).into();
        match error {
            AppError::Conflict(msg) => msg,
            other => panic!("expected a conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_unique_violation_message_follows_constraint() {
        assert_eq!(conflict_message(Some("users_pkey")), "Email already exists");
        assert_eq!(
            conflict_message(Some("tasks_pkey")),
            "Constraint violation: tasks_pkey"
        );
        assert_eq!(conflict_message(None), "Record already exists");
    }

    #[test]
    fn test_row_not_found_is_database_error() {
        let error: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, AppError::DatabaseError(_)));
    }
}
