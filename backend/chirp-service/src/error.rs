/// Error types for Chirp Service
///
/// Every failure surfaces to API clients as
/// `{"result": false, "error_type": ..., "error_message": ...}` with a status
/// code derived from the error kind.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use thiserror::Error;

use crate::storage::StorageError;

/// Result type for chirp-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Values carried in the `error_type` field of the error envelope.
pub mod codes {
    pub const NO_USER: &str = "NO USER";
    pub const NO_TWEET: &str = "NO TWEET";
    pub const BAD_USER: &str = "BAD USER";
    pub const BAD_FOLLOW: &str = "BAD FOLLOW";
    pub const BAD_FOLLOW_DELETE: &str = "BAD FOLLOW DELETE";
    pub const NO_ACCESS: &str = "NO ACCESS";
    pub const BAD_LIKE: &str = "BAD LIKE";
    pub const BAD_LIKE_DELETE: &str = "BAD LIKE DELETE";
    pub const BAD_FILE: &str = "BAD FILE";
    pub const BAD_REQUEST: &str = "BAD REQUEST";
    pub const INTERNAL: &str = "INTERNAL ERROR";
}

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing user, tweet, follow edge or like edge
    #[error("{message}")]
    NotFound { code: &'static str, message: String },

    /// Duplicate follow, like or api key
    #[error("{message}")]
    Conflict { code: &'static str, message: String },

    /// Ownership violation
    #[error("{message}")]
    Forbidden { code: &'static str, message: String },

    /// Rejected input (self-follow, bad media type, malformed request)
    #[error("{message}")]
    InvalidInput { code: &'static str, message: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    result: bool,
    error_type: &'a str,
    error_message: String,
}

impl AppError {
    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        AppError::NotFound {
            code,
            message: message.into(),
        }
    }

    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        AppError::Conflict {
            code,
            message: message.into(),
        }
    }

    pub fn forbidden(code: &'static str, message: impl Into<String>) -> Self {
        AppError::Forbidden {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_input(code: &'static str, message: impl Into<String>) -> Self {
        AppError::InvalidInput {
            code,
            message: message.into(),
        }
    }

    /// Translate a constraint violation raised by a write into a business error.
    ///
    /// Unique violations become `Conflict`, foreign-key violations `NotFound`
    /// and check violations `InvalidInput`, all tagged with `code`/`message`.
    /// Any other database failure stays a `Database` error.
    pub fn from_constraint(err: sqlx::Error, code: &'static str, message: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return AppError::conflict(code, message);
            }
            if db_err.is_foreign_key_violation() {
                return AppError::not_found(code, message);
            }
            if db_err.is_check_violation() {
                return AppError::invalid_input(code, message);
            }
        }
        AppError::Database(err)
    }

    /// Value of the `error_type` field.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound { code, .. }
            | AppError::Conflict { code, .. }
            | AppError::Forbidden { code, .. }
            | AppError::InvalidInput { code, .. } => code,
            AppError::Database(_) | AppError::Storage(_) | AppError::Internal(_) => {
                codes::INTERNAL
            }
        }
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound { .. } => "not_found",
            AppError::Conflict { .. } => "conflict",
            AppError::Forbidden { .. } => "forbidden",
            AppError::InvalidInput { .. } => "invalid_input",
            AppError::Database(_) => "database",
            AppError::Storage(_) => "storage",
            AppError::Internal(_) => "internal",
        }
    }

    fn is_server_error(&self) -> bool {
        matches!(
            self,
            AppError::Database(_) | AppError::Storage(_) | AppError::Internal(_)
        )
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Storage(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_message = if self.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(self.status_code()).json(ErrorBody {
            result: false,
            error_type: self.code(),
            error_message,
        })
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UnsupportedContentType(_) | StorageError::EmptyPayload => {
                AppError::invalid_input(codes::BAD_FILE, err.to_string())
            }
            StorageError::Io(e) => AppError::Storage(e.to_string()),
        }
    }
}
