//! Media files in the private upload directory.

use std::path::{Path, PathBuf};

use audition_core::media::is_safe_file_name;

/// Resolve `file_name` inside `uploads_dir`.
///
/// Returns `None` for names that are not a single plain path component, so
/// callers can never escape the upload directory.
pub fn resolve_media_path(uploads_dir: &Path, file_name: &str) -> Option<PathBuf> {
    is_safe_file_name(file_name).then(|| uploads_dir.join(file_name))
}

/// Delete each named file from `uploads_dir`, best effort.
///
/// Files that are already gone are skipped silently; other failures are
/// logged and skipped. Returns the paths that were actually removed.
pub async fn remove_media_files<I, S>(uploads_dir: &Path, names: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut removed = Vec::new();
    for name in names {
        let Some(path) = resolve_media_path(uploads_dir, name.as_ref()) else {
            tracing::warn!(file = name.as_ref(), "Skipping unsafe media file name");
            continue;
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => removed.push(path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Media file already absent");
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove media file");
            }
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traversal_names_do_not_resolve() {
        let dir = Path::new("/data/uploads");
        assert_eq!(resolve_media_path(dir, "../users.json"), None);
        assert_eq!(
            resolve_media_path(dir, "a.webm"),
            Some(PathBuf::from("/data/uploads/a.webm"))
        );
    }

    #[tokio::test]
    async fn removes_present_files_and_skips_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.webm"), b"a").unwrap();
        std::fs::write(dir.path().join("b.webm"), b"b").unwrap();

        let removed = remove_media_files(dir.path(), ["a.webm", "gone.webm", "b.webm"]).await;

        assert_eq!(removed.len(), 2);
        assert!(!dir.path().join("a.webm").exists());
        assert!(!dir.path().join("b.webm").exists());
    }
}
