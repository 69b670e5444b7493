//! Repository for the `submissions.json` document.

use std::path::PathBuf;

use audition_core::submission::{NewSubmission, Submission, SubmissionPatch};
use audition_core::types::next_time_id;

use crate::error::StoreError;
use crate::kind::ResourceKind;
use crate::media::remove_media_files;
use crate::store::JsonStore;

/// A removed submission and the media files that were deleted with it.
#[derive(Debug)]
pub struct DeletedSubmission {
    pub submission: Submission,
    pub removed_files: Vec<PathBuf>,
}

/// Provides the submission lifecycle: create, list, fetch, patch, delete.
pub struct SubmissionRepo;

impl SubmissionRepo {
    /// All submissions in stored (creation) order.
    pub async fn list(store: &JsonStore) -> Result<Vec<Submission>, StoreError> {
        store.read().await
    }

    /// Find a submission by id.
    pub async fn find_by_id(store: &JsonStore, id: &str) -> Result<Option<Submission>, StoreError> {
        let submissions: Vec<Submission> = store.read().await?;
        Ok(submissions.into_iter().find(|s| s.id == id))
    }

    /// Id of the first stored submission that already references any of
    /// `file_names`, if one does.
    pub async fn find_media_owner(
        store: &JsonStore,
        file_names: &[&str],
    ) -> Result<Option<String>, StoreError> {
        if file_names.is_empty() {
            return Ok(None);
        }
        let submissions: Vec<Submission> = store.read().await?;
        Ok(submissions
            .into_iter()
            .find(|s| {
                s.media_file_names()
                    .iter()
                    .any(|name| file_names.contains(&name.as_str()))
            })
            .map(|s| s.id))
    }

    /// Append a new submission with a fresh time-based id.
    ///
    /// Intake validation against the form schema is the caller's job.
    pub async fn create(store: &JsonStore, input: NewSubmission) -> Result<Submission, StoreError> {
        let lock = store.lock(ResourceKind::Submissions).await;
        let mut submissions: Vec<Submission> = store.load(&lock).await?;
        let id = next_time_id(submissions.iter().map(|s| s.id.as_str()));
        let submission = Submission::new(id, chrono::Utc::now(), input);
        submissions.push(submission.clone());
        store.save(&lock, &submissions).await?;
        Ok(submission)
    }

    /// Apply a validated patch. Returns `None` if no submission has `id`.
    pub async fn update(
        store: &JsonStore,
        id: &str,
        patch: &SubmissionPatch,
    ) -> Result<Option<Submission>, StoreError> {
        store
            .update(|submissions: &mut Vec<Submission>| {
                let submission = submissions.iter_mut().find(|s| s.id == id)?;
                submission.apply(patch);
                Some(submission.clone())
            })
            .await
    }

    /// Remove a submission record. Returns `None` if no submission has `id`.
    pub async fn delete(store: &JsonStore, id: &str) -> Result<Option<Submission>, StoreError> {
        store
            .update(|submissions: &mut Vec<Submission>| {
                let pos = submissions.iter().position(|s| s.id == id)?;
                Some(submissions.remove(pos))
            })
            .await
    }

    /// Remove a submission and then, best effort, every media file it
    /// references (answer videos and the merged video).
    pub async fn delete_with_media(
        store: &JsonStore,
        id: &str,
    ) -> Result<Option<DeletedSubmission>, StoreError> {
        let Some(submission) = Self::delete(store, id).await? else {
            return Ok(None);
        };
        let removed_files =
            remove_media_files(store.uploads_dir(), submission.media_file_names()).await;
        tracing::info!(
            submission_id = %submission.id,
            removed = removed_files.len(),
            "Deleted submission"
        );
        Ok(Some(DeletedSubmission {
            submission,
            removed_files,
        }))
    }
}
