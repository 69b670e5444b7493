//! Media file naming, URL mapping, and upload rules.
//!
//! Every stored media file lives flat in the private upload directory and is
//! addressed as `/api/files/<name>`. Older records may still carry
//! `/uploads/<name>` references from when uploads were public.

use rand::distr::Alphanumeric;
use rand::Rng;

/// URL prefix under which private media is served.
pub const FILES_URL_PREFIX: &str = "/api/files/";

/// URL prefix of the legacy public upload directory.
pub const LEGACY_UPLOADS_URL_PREFIX: &str = "/uploads/";

/// MIME types accepted by the upload endpoint.
pub const ALLOWED_UPLOAD_TYPES: &[&str] = &[
    "video/webm",
    "video/mp4",
    "image/png",
    "image/jpeg",
    "image/jpg",
];

/// Extension used when an upload's original name has none.
pub const DEFAULT_UPLOAD_EXTENSION: &str = ".webm";

/// Length of the random suffix in generated upload names.
const RANDOM_SUFFIX_LEN: usize = 7;

/// Extract the trailing file name from a media URL or path.
///
/// Returns `None` when the result would not be a safe single path component.
pub fn file_name_from_url(url: &str) -> Option<&str> {
    let name = url.rsplit('/').next()?;
    is_safe_file_name(name).then_some(name)
}

/// Public URL for a stored media file.
pub fn file_url(file_name: &str) -> String {
    format!("{FILES_URL_PREFIX}{file_name}")
}

/// A file name is safe when it is one plain path component: non-empty, not
/// `.` or `..`, and free of separators and NUL bytes.
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// Whether `name` has the shape [`generate_upload_name`] produces:
/// `<millis>-<7 lowercase alphanumerics>.<ext>`.
pub fn is_upload_name(name: &str) -> bool {
    let Some((millis, rest)) = name.split_once('-') else {
        return false;
    };
    let Some((suffix, ext)) = rest.split_once('.') else {
        return false;
    };
    !millis.is_empty()
        && millis.bytes().all(|b| b.is_ascii_digit())
        && suffix.len() == RANDOM_SUFFIX_LEN
        && suffix
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
        && !ext.is_empty()
        && ext.bytes().all(|b| b.is_ascii_alphanumeric())
}

pub fn is_allowed_upload_type(content_type: &str) -> bool {
    ALLOWED_UPLOAD_TYPES.contains(&content_type)
}

/// Extension (including the dot) of an uploaded file's original name.
pub fn upload_extension(original_name: Option<&str>) -> String {
    original_name
        .and_then(|n| n.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_else(|| DEFAULT_UPLOAD_EXTENSION.to_string())
}

/// Generate a stored name `<millis>-<random><ext>` for an upload.
pub fn generate_upload_name(extension: &str) -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_SUFFIX_LEN)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect();
    format!("{}-{suffix}{extension}", crate::types::now_millis())
}

/// Output name for a merged recording of `submission_id`.
pub fn merged_file_name(submission_id: &str, millis: i64) -> String {
    format!("merged-{submission_id}-{millis}.webm")
}

/// Guess a Content-Type from a file extension.
pub fn content_type_for_file(name: &str) -> &'static str {
    let ext = name.rsplit('.').next().unwrap_or("").to_lowercase();
    match ext.as_str() {
        "webm" => "video/webm",
        "mp4" => "video/mp4",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}
