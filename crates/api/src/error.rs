use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use repcount_core::error::{AuthError, CoreError};
use repcount_db::store::StoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`AuthError`] for domain errors and adds
/// HTTP-specific variants. Implements [`IntoResponse`] to produce consistent
/// JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `repcount_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A session or guard failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A credential store error outside the session manager (registration).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Message returned for every 500; the cause only goes to the log.
const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- Validation ---
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }

            // --- Session and guard failures ---
            AppError::Auth(auth) => {
                let status = match auth {
                    AuthError::NotFound => StatusCode::NOT_FOUND,
                    AuthError::InvalidCredentials | AuthError::Unauthorized => {
                        StatusCode::UNAUTHORIZED
                    }
                    AuthError::Forbidden | AuthError::InvalidRefreshToken => StatusCode::FORBIDDEN,
                    AuthError::Internal(msg) => {
                        tracing::error!(error = %msg, "Internal auth error");
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                let message = match auth {
                    AuthError::Internal(_) => INTERNAL_MESSAGE.to_string(),
                    other => other.to_string(),
                };
                (status, auth.code(), message)
            }

            // --- Store errors ---
            AppError::Store(StoreError::Conflict(constraint)) => (
                StatusCode::CONFLICT,
                "CONFLICT",
                conflict_message(constraint),
            ),
            AppError::Store(StoreError::Database(err)) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Human-readable message for a unique constraint violation on `users`.
fn conflict_message(constraint: &str) -> String {
    match constraint {
        "uq_users_email" | "uq_users_username" => {
            "User with email or username already exists".to_string()
        }
        other => format!("Duplicate value violates unique constraint: {other}"),
    }
}
