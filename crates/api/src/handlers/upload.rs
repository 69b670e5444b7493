//! Handler for `POST /upload` (answer recordings and branding assets).

use std::path::{Path, PathBuf};

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use audition_core::media::{
    file_url, generate_upload_name, is_allowed_upload_type, upload_extension,
};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::SuccessWith;
use crate::state::AppState;

/// Value of the multipart `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadVisibility {
    /// Candidate answer recordings. No session required.
    Private,
    /// Branding assets (logo, favicon, share image). Admin only.
    Public,
}

impl UploadVisibility {
    /// Anything other than `public` is treated as private.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("public") {
            Self::Public
        } else {
            Self::Private
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadBody {
    pub url: String,
}

/// Fields collected from the multipart body.
struct UploadForm {
    visibility: UploadVisibility,
    stored: Option<(String, PathBuf)>,
}

/// POST /api/upload
///
/// Multipart form with a `file` part and an optional `type` part
/// (`private` by default). Every upload is written to the private media
/// directory and addressed as `/api/files/<name>`.
pub async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> AppResult<Json<SuccessWith<UploadBody>>> {
    let mut form = UploadForm {
        visibility: UploadVisibility::Private,
        stored: None,
    };

    let received = read_form(&state, &headers, &mut multipart, &mut form).await;

    // Public uploads may name their type after the file part.
    let authorized = match (&received, form.visibility) {
        (Ok(()), UploadVisibility::Public) => {
            AuthUser::from_headers(&headers, &state.config.jwt).map(|_| ())
        }
        _ => Ok(()),
    };

    if let Err(e) = received.and(authorized) {
        if let Some((_, path)) = &form.stored {
            discard(path).await;
        }
        return Err(e);
    }

    let Some((name, path)) = form.stored else {
        return Err(AppError::BadRequest("No file uploaded".into()));
    };

    tracing::info!(
        file = %name,
        path = %path.display(),
        visibility = ?form.visibility,
        "Upload stored"
    );
    Ok(Json(SuccessWith::new(UploadBody {
        url: file_url(&name),
    })))
}

async fn read_form(
    state: &AppState,
    headers: &HeaderMap,
    multipart: &mut Multipart,
    form: &mut UploadForm,
) -> AppResult<()> {
    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().map(str::to_owned);
        match field_name.as_deref() {
            Some("type") => {
                let value = field.text().await.map_err(multipart_error)?;
                form.visibility = UploadVisibility::parse(&value);
                if form.visibility == UploadVisibility::Public {
                    AuthUser::from_headers(headers, &state.config.jwt)?;
                }
            }
            Some("file") if form.stored.is_none() => {
                let content_type = field.content_type().map(mime_essence).unwrap_or_default();
                if !is_allowed_upload_type(&content_type) {
                    return Err(AppError::BadRequest("Invalid file type".into()));
                }

                let name = generate_upload_name(&upload_extension(field.file_name()));
                let path = state.store.uploads_dir().join(&name);
                form.stored = Some((name, path.clone()));
                write_field(&mut field, &path).await?;
            }
            _ => {}
        }
    }
    Ok(())
}

/// Stream one multipart part to `path`.
async fn write_field(field: &mut Field<'_>, path: &Path) -> AppResult<()> {
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create {}: {e}", path.display())))?;

    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        file.write_all(&chunk)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to write {}: {e}", path.display())))?;
    }
    file.flush()
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to write {}: {e}", path.display())))?;
    Ok(())
}

/// Remove a partially written or rejected upload.
async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove rejected upload");
        }
    }
}

/// `video/webm;codecs=vp8` -> `video/webm`.
fn mime_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Upload exceeds the size limit".into())
    } else {
        AppError::BadRequest(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_defaults_to_private() {
        assert_eq!(UploadVisibility::parse("public"), UploadVisibility::Public);
        assert_eq!(UploadVisibility::parse(" Public "), UploadVisibility::Public);
        assert_eq!(UploadVisibility::parse("private"), UploadVisibility::Private);
        assert_eq!(UploadVisibility::parse("anything"), UploadVisibility::Private);
    }

    #[test]
    fn mime_parameters_are_ignored() {
        assert_eq!(mime_essence("video/webm;codecs=vp8,opus"), "video/webm");
        assert_eq!(mime_essence("IMAGE/PNG"), "image/png");
        assert_eq!(mime_essence(""), "");
    }
}
