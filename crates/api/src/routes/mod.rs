pub mod auth;
pub mod form_schema;
pub mod health;
pub mod media;
pub mod notifications;
pub mod questions;
pub mod submissions;
pub mod terms;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api` route tree, except the merge routes (see
/// [`merge_routes`]).
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                          login (public)
/// /auth/logout                         logout (public)
/// /auth/change-password                change own password
///
/// /questions                           list (public), replace
/// /questions/reorder                   move one question
///
/// /form-schema                         list (public), replace
/// /form-schema/reorder                 move one field
///
/// /terms                               get (public), replace
///
/// /submissions                         list, create (public)
/// /submissions/{id}                    get, update, delete
///
/// /upload                              multipart upload
/// /files/{filename}                    serve private media
///
/// /notifications                       list, append
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/questions", questions::router())
        .nest("/form-schema", form_schema::router())
        .nest("/terms", terms::router())
        .nest("/submissions", submissions::router())
        .nest("/notifications", notifications::router())
        .merge(media::router(config.max_upload_bytes))
}

/// Routes that run ffmpeg and so get the longer merge timeout.
///
/// ```text
/// /submissions/{id}/merge              merge, delete merged video
/// ```
pub fn merge_routes() -> Router<AppState> {
    Router::new().nest("/submissions", submissions::merge_router())
}
