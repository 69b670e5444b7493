//! Request extractors with the application's error envelope.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` whose rejections become [`AppError::BadRequest`].
///
/// Bodies that are not JSON, or whose values do not fit the target type
/// (an unknown status, a negative index), answer 400 with the usual
/// `{ "error", "code" }` body instead of axum's plain-text 415/422.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
