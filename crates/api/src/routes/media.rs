//! Route definitions for media upload and retrieval.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{files, upload};
use crate::state::AppState;

/// Routes mounted at the API root.
///
/// ```text
/// POST /upload            -> upload (type=public requires auth)
/// GET  /files/{filename}  -> serve (auth unless a branding asset)
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/upload",
            post(upload::upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/files/{filename}", get(files::serve))
}
