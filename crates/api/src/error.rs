use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use musiclib_core::error::CoreError;
use serde::Serialize;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `musiclib_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        CoreError::invalid_parameter("invalid query string", rejection.body_text()).into()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        CoreError::invalid_parameter("invalid request body", rejection.body_text()).into()
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Database(err) => classify_sqlx_error(&err),
            AppError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    message,
                    code: "BAD_REQUEST",
                    details: None,
                },
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Map a domain error to its status and body.
///
/// Lookups that find nothing are reported as 400 `NOT_FOUND`; this API
/// treats a missing song as a bad client reference, not a missing route.
fn classify_core_error(err: CoreError) -> (StatusCode, ErrorBody) {
    match err {
        CoreError::NotFound { entity, details } => (
            StatusCode::BAD_REQUEST,
            ErrorBody {
                message: format!("{entity} not found"),
                code: "NOT_FOUND",
                details: Some(details),
            },
        ),
        CoreError::InvalidParameter { message, details } => (
            StatusCode::BAD_REQUEST,
            ErrorBody {
                message,
                code: "INVALID_PARAMETER",
                details,
            },
        ),
        CoreError::InvalidFilter {
            field,
            value,
            message,
        } => (
            StatusCode::BAD_REQUEST,
            ErrorBody {
                message: format!("invalid filter: {message}"),
                code: "INVALID_FILTER",
                details: Some(format!("{field}={value}")),
            },
        ),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (StatusCode::INTERNAL_SERVER_ERROR, internal_body())
        }
    }
}

/// Classify a sqlx error into an HTTP status and body.
///
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, ErrorBody) {
    if let sqlx::Error::Database(db_err) = err {
        // PostgreSQL unique constraint violation: error code 23505
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return (
                    StatusCode::CONFLICT,
                    ErrorBody {
                        message: "song already exists".to_string(),
                        code: "CONFLICT",
                        details: Some(format!(
                            "duplicate value violates unique constraint: {constraint}"
                        )),
                    },
                );
            }
        }
    }

    tracing::error!(error = %err, "Database error");
    (StatusCode::INTERNAL_SERVER_ERROR, internal_body())
}

fn internal_body() -> ErrorBody {
    ErrorBody {
        message: "An internal error occurred".to_string(),
        code: "INTERNAL_ERROR",
        details: None,
    }
}
