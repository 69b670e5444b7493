use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use audition_core::error::CoreError;
use audition_db::StoreError;
use audition_pipeline::MergeError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors, the storage and merge errors of the
/// lower crates, and adds HTTP-specific variants. Implements [`IntoResponse`]
/// to produce consistent `{ "error", "code" }` JSON responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `audition_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A JSON store failure (I/O or malformed document).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A merge orchestration failure.
    #[error(transparent)]
    Merge(#[from] MergeError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body over the configured size limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Too many login attempts from one client.
    #[error("Too many login attempts")]
    RateLimited { retry_after_secs: u64 },

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Storage errors ---
            AppError::Store(err) => {
                tracing::error!(error = %err, "Storage error");
                internal()
            }

            // --- Merge errors ---
            AppError::Merge(err) => match err {
                MergeError::NotFound(id) => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("Submission with id {id} not found"),
                ),
                MergeError::NothingToMerge => {
                    (StatusCode::BAD_REQUEST, "NOTHING_TO_MERGE", err.to_string())
                }
                MergeError::NoMergedVideo => {
                    (StatusCode::BAD_REQUEST, "NO_MERGED_VIDEO", err.to_string())
                }
                MergeError::ExternalTool(tool_err) => {
                    tracing::error!(error = %tool_err, "External media tool failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "EXTERNAL_TOOL_ERROR",
                        "Video merge failed".to_string(),
                    )
                }
                MergeError::Store(_) | MergeError::Io { .. } => {
                    tracing::error!(error = %err, "Merge storage error");
                    internal()
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::RateLimited { .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                "Too many login attempts, try again later".to_string(),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        let mut response = (status, axum::Json(body)).into_response();
        if let AppError::RateLimited { retry_after_secs } = self {
            if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

/// Shorthand for a missing submission.
pub fn submission_not_found(id: &str) -> AppError {
    AppError::Core(CoreError::not_found("Submission", id))
}
