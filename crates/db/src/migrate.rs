//! One-off migration of media references from the legacy public upload
//! directory into the private one.

use std::path::Path;

use audition_core::media::{file_name_from_url, file_url, LEGACY_UPLOADS_URL_PREFIX};
use audition_core::submission::Submission;

use crate::error::StoreError;
use crate::kind::ResourceKind;
use crate::store::JsonStore;

/// Counts reported by [`migrate_legacy_uploads`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Files moved into the private directory.
    pub moved: usize,
    /// Submissions whose references were rewritten.
    pub updated: usize,
    /// Legacy references whose file was not found in either directory.
    pub missing: usize,
}

/// Move every `/uploads/<name>` file referenced by a submission into the
/// private upload directory and rewrite the reference to `/api/files/<name>`.
///
/// Runs under the submissions guard for its whole span. Files already present
/// in the private directory are left in place.
pub async fn migrate_legacy_uploads(
    store: &JsonStore,
    legacy_dir: &Path,
) -> Result<MigrationReport, StoreError> {
    let lock = store.lock(ResourceKind::Submissions).await;
    let mut submissions: Vec<Submission> = store.load(&lock).await?;
    let mut report = MigrationReport::default();

    for submission in &mut submissions {
        let mut changed = false;
        let references = submission
            .answers
            .iter_mut()
            .filter_map(|a| a.video_url.as_mut())
            .chain(submission.merged_video_url.as_mut());

        for url in references {
            if !url.starts_with(LEGACY_UPLOADS_URL_PREFIX) {
                continue;
            }
            let Some(name) = file_name_from_url(url).map(str::to_string) else {
                tracing::warn!(url = %url, "Skipping malformed legacy reference");
                continue;
            };

            let from = legacy_dir.join(&name);
            let to = store.uploads_dir().join(&name);
            if tokio::fs::try_exists(&from).await.unwrap_or(false) {
                move_file(&from, &to).await?;
                report.moved += 1;
            } else if !tokio::fs::try_exists(&to).await.unwrap_or(false) {
                tracing::warn!(file = %name, "Legacy media file not found");
                report.missing += 1;
            }

            *url = file_url(&name);
            changed = true;
        }

        if changed {
            report.updated += 1;
        }
    }

    if report.updated > 0 {
        store.save(&lock, &submissions).await?;
    }
    tracing::info!(
        moved = report.moved,
        updated = report.updated,
        missing = report.missing,
        "Legacy upload migration finished"
    );
    Ok(report)
}

/// Rename, falling back to copy-and-remove across filesystems.
async fn move_file(from: &Path, to: &Path) -> Result<(), StoreError> {
    if tokio::fs::rename(from, to).await.is_ok() {
        return Ok(());
    }
    tokio::fs::copy(from, to)
        .await
        .map_err(|e| StoreError::io(to, e))?;
    tokio::fs::remove_file(from)
        .await
        .map_err(|e| StoreError::io(from, e))
}

#[cfg(test)]
mod tests {
    use audition_core::submission::{Answer, NewSubmission};

    use super::*;
    use crate::repositories::SubmissionRepo;
    use crate::store::StoreConfig;

    #[tokio::test]
    async fn legacy_references_are_moved_and_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let legacy = tempfile::tempdir().unwrap();
        let store = JsonStore::open(StoreConfig::in_dir(dir.path())).await.unwrap();

        std::fs::write(legacy.path().join("old.webm"), b"video").unwrap();
        let input = NewSubmission {
            candidate_name: Some("Legacy".into()),
            answers: vec![
                Answer {
                    question_id: "1".into(),
                    video_url: Some("/uploads/old.webm".into()),
                    transcript: None,
                },
                Answer {
                    question_id: "2".into(),
                    video_url: Some("/uploads/lost.webm".into()),
                    transcript: None,
                },
                Answer {
                    question_id: "3".into(),
                    video_url: Some("/api/files/new.webm".into()),
                    transcript: None,
                },
            ],
            ..NewSubmission::default()
        };
        let created = SubmissionRepo::create(&store, input).await.unwrap();

        let report = migrate_legacy_uploads(&store, legacy.path()).await.unwrap();
        assert_eq!(
            report,
            MigrationReport {
                moved: 1,
                updated: 1,
                missing: 1
            }
        );
        assert!(store.uploads_dir().join("old.webm").exists());
        assert!(!legacy.path().join("old.webm").exists());

        let stored = SubmissionRepo::find_by_id(&store, &created.id)
            .await
            .unwrap()
            .unwrap();
        let urls: Vec<_> = stored
            .answers
            .iter()
            .filter_map(|a| a.video_url.as_deref())
            .collect();
        assert_eq!(
            urls,
            ["/api/files/old.webm", "/api/files/lost.webm", "/api/files/new.webm"]
        );

        let rerun = migrate_legacy_uploads(&store, legacy.path()).await.unwrap();
        assert_eq!(rerun, MigrationReport::default());
    }
}
