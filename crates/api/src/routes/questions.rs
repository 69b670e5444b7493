//! Route definitions for the `/questions` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::questions;
use crate::state::AppState;

/// Routes mounted at `/questions`.
///
/// ```text
/// GET  /          -> list
/// POST /          -> replace (requires auth)
/// POST /reorder   -> reorder (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(questions::list).post(questions::replace))
        .route("/reorder", post(questions::reorder))
}
