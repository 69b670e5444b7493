//! Handler for `GET /files/{filename}` (private media).

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::HeaderMap;
use axum::response::Response;
use tokio_util::io::ReaderStream;
use audition_core::error::CoreError;
use audition_core::media::content_type_for_file;
use audition_db::media::resolve_media_path;
use audition_db::repositories::TermsRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

const FILE_CACHE_CONTROL: &str = "private, max-age=3600";

/// GET /api/files/{filename}
///
/// Stream a stored media file. Branding assets referenced by the site
/// configuration are public; everything else needs an admin session.
pub async fn serve(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let path = resolve_media_path(state.store.uploads_dir(), &filename).ok_or_else(|| {
        tracing::warn!(file = %filename, "Rejected media path");
        AppError::Core(CoreError::Forbidden("Access denied".into()))
    })?;

    let site = TermsRepo::get(&state.store).await?;
    if !site.is_public_asset(&filename) {
        AuthUser::from_headers(&headers, &state.config.jwt)?;
    }

    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::Core(CoreError::not_found("File", filename)));
        }
        Err(e) => {
            return Err(AppError::InternalError(format!(
                "Failed to open {}: {e}",
                path.display()
            )));
        }
    };

    let mut response = Response::builder()
        .header(CONTENT_TYPE, content_type_for_file(&filename))
        .header(CACHE_CONTROL, FILE_CACHE_CONTROL);
    if let Ok(meta) = file.metadata().await {
        response = response.header(CONTENT_LENGTH, meta.len());
    }

    response
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| AppError::InternalError(format!("Failed to build file response: {e}")))
}
