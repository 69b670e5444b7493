//! Route definitions for the `/form-schema` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::form_schema;
use crate::state::AppState;

/// Routes mounted at `/form-schema`.
///
/// ```text
/// GET  /          -> list
/// POST /          -> replace (requires auth)
/// POST /reorder   -> reorder (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(form_schema::list).post(form_schema::replace))
        .route("/reorder", post(form_schema::reorder))
}
