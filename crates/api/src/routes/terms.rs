//! Route definitions for the `/terms` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::terms;
use crate::state::AppState;

/// Routes mounted at `/terms`.
///
/// ```text
/// GET  /  -> get
/// POST /  -> replace (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(terms::get).post(terms::replace))
}
