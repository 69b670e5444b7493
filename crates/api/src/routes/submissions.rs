//! Route definitions for the `/submissions` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{merge, submissions};
use crate::state::AppState;

/// Routes mounted at `/submissions`.
///
/// ```text
/// GET    /       -> list (requires auth)
/// POST   /       -> create (public)
/// GET    /{id}   -> get_by_id (requires auth)
/// PUT    /{id}   -> update (requires auth)
/// DELETE /{id}   -> delete (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(submissions::list).post(submissions::create))
        .route(
            "/{id}",
            get(submissions::get_by_id)
                .put(submissions::update)
                .delete(submissions::delete),
        )
}

/// Merge routes, mounted at `/submissions` with their own timeout.
///
/// ```text
/// POST   /{id}/merge  -> merge (requires auth)
/// DELETE /{id}/merge  -> delete_merged (requires auth)
/// ```
pub fn merge_router() -> Router<AppState> {
    Router::new().route("/{id}/merge", post(merge::merge).delete(merge::delete_merged))
}
