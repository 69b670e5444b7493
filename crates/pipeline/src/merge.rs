//! Merge orchestrator.
//!
//! Merging a submission:
//!
//! 1. take the submission's merge lock,
//! 2. resolve each answer video to a file in the private upload directory,
//!    skipping answers without a video and files that no longer exist,
//! 3. write a concat manifest into the temp directory,
//! 4. run the concatenator into `merged-<id>-<millis>.webm`,
//! 5. remove the manifest (always),
//! 6. store the new `mergedVideoUrl`, then remove the previous merged file.
//!
//! On any failure before step 6 the submission is left unmodified and a
//! partial output is removed.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use audition_core::ffmpeg::{render_concat_manifest, FfmpegError};
use audition_core::media::{file_name_from_url, file_url, merged_file_name};
use audition_core::submission::{Submission, SubmissionPatch};
use audition_core::types::now_millis;
use audition_db::media::{remove_media_files, resolve_media_path};
use audition_db::repositories::SubmissionRepo;
use audition_db::{JsonStore, StoreError};

use crate::concat::MediaConcatenator;
use crate::locks::MergeLocks;

#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("Submission not found: {0}")]
    NotFound(String),

    #[error("No videos to merge")]
    NothingToMerge,

    #[error("No merged video to delete")]
    NoMergedVideo,

    #[error("Video merge failed: {0}")]
    ExternalTool(#[from] FfmpegError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Merge I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of a successful merge.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// Reference stored on the submission (`/api/files/<name>`).
    pub url: String,
    pub submission: Submission,
}

pub struct MergeService {
    store: Arc<JsonStore>,
    concatenator: Arc<dyn MediaConcatenator>,
    tmp_dir: PathBuf,
    locks: MergeLocks,
}

impl MergeService {
    pub fn new(
        store: Arc<JsonStore>,
        concatenator: Arc<dyn MediaConcatenator>,
        tmp_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            concatenator,
            tmp_dir: tmp_dir.into(),
            locks: MergeLocks::new(),
        }
    }

    /// Merge the submission's answer recordings and store the reference.
    pub async fn merge(&self, submission_id: &str) -> Result<MergeOutcome, MergeError> {
        let _lock = self.locks.acquire(submission_id).await;

        let submission = SubmissionRepo::find_by_id(&self.store, submission_id)
            .await?
            .ok_or_else(|| MergeError::NotFound(submission_id.to_string()))?;

        let inputs = self.resolve_inputs(&submission).await;
        if inputs.is_empty() {
            return Err(MergeError::NothingToMerge);
        }

        let output_name = merged_file_name(submission_id, now_millis());
        let output = self.store.uploads_dir().join(&output_name);
        let manifest = self.write_manifest(submission_id, &inputs).await?;

        tracing::info!(
            submission_id,
            inputs = inputs.len(),
            tool = self.concatenator.name(),
            output = %output.display(),
            "Merging submission videos"
        );
        let result = self.concatenator.concat(&manifest, &output).await;
        remove_quietly(&manifest).await;

        if let Err(e) = result {
            tracing::error!(submission_id, error = %e, "Video merge failed");
            remove_quietly(&output).await;
            return Err(MergeError::ExternalTool(e));
        }

        let url = file_url(&output_name);
        let patch = SubmissionPatch::merged_video(Some(url.clone()));
        let updated = match SubmissionRepo::update(&self.store, submission_id, &patch).await {
            Ok(Some(updated)) => updated,
            Ok(None) => {
                // Deleted while the tool ran.
                remove_quietly(&output).await;
                return Err(MergeError::NotFound(submission_id.to_string()));
            }
            Err(e) => {
                remove_quietly(&output).await;
                return Err(e.into());
            }
        };

        if let Some(previous) = submission
            .merged_video_url
            .as_deref()
            .and_then(file_name_from_url)
            .filter(|name| *name != output_name)
        {
            remove_media_files(self.store.uploads_dir(), [previous]).await;
        }

        tracing::info!(submission_id, url = %url, "Stored merged video");
        Ok(MergeOutcome {
            url,
            submission: updated,
        })
    }

    /// Remove the merged video file and clear the reference.
    pub async fn delete_merged(&self, submission_id: &str) -> Result<Submission, MergeError> {
        let _lock = self.locks.acquire(submission_id).await;

        let submission = SubmissionRepo::find_by_id(&self.store, submission_id)
            .await?
            .ok_or_else(|| MergeError::NotFound(submission_id.to_string()))?;
        let Some(url) = submission.merged_video_url.as_deref() else {
            return Err(MergeError::NoMergedVideo);
        };

        if let Some(name) = file_name_from_url(url) {
            if remove_media_files(self.store.uploads_dir(), [name]).await.is_empty() {
                tracing::warn!(submission_id, file = name, "Merged video file was not removed");
            }
        }

        SubmissionRepo::update(&self.store, submission_id, &SubmissionPatch::merged_video(None))
            .await?
            .ok_or_else(|| MergeError::NotFound(submission_id.to_string()))
    }

    /// Existing answer video files, in answer order.
    async fn resolve_inputs(&self, submission: &Submission) -> Vec<PathBuf> {
        let mut inputs = Vec::new();
        for name in submission.answer_video_file_names() {
            let Some(path) = resolve_media_path(self.store.uploads_dir(), &name) else {
                continue;
            };
            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                inputs.push(path);
            } else {
                tracing::warn!(submission_id = %submission.id, file = %name, "Answer video missing, skipping");
            }
        }
        inputs
    }

    async fn write_manifest(
        &self,
        submission_id: &str,
        inputs: &[PathBuf],
    ) -> Result<PathBuf, MergeError> {
        tokio::fs::create_dir_all(&self.tmp_dir)
            .await
            .map_err(|source| MergeError::Io {
                path: self.tmp_dir.clone(),
                source,
            })?;
        let manifest = self
            .tmp_dir
            .join(format!("concat-{submission_id}-{}.txt", now_millis()));
        tokio::fs::write(&manifest, render_concat_manifest(inputs))
            .await
            .map_err(|source| MergeError::Io {
                path: manifest.clone(),
                source,
            })?;
        Ok(manifest)
    }
}

async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove temporary file");
        }
    }
}
