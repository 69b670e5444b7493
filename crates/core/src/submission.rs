//! Candidate submissions and their typed partial updates.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::media::{file_name_from_url, is_upload_name, FILES_URL_PREFIX};
use crate::types::{double_option, string_or_number, RecordId, Timestamp};

/// Fallback display name when the intake answers carry none.
pub const UNKNOWN_CANDIDATE: &str = "Unknown";

/// Lowest and highest accepted rating.
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Review outcome set by an admin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    #[default]
    Unreviewed,
    Passed,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unreviewed => "unreviewed",
            Self::Passed => "passed",
            Self::Rejected => "rejected",
        }
    }
}

/// Admin evaluation attached to every submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(default)]
    pub status: ReviewStatus,
    #[serde(default, deserialize_with = "rating_or_unrated")]
    pub rating: Option<u8>,
    #[serde(default)]
    pub notes: String,
}

/// A recorded answer to one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    #[serde(deserialize_with = "string_or_number")]
    pub question_id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

/// One candidate's complete interview record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(deserialize_with = "string_or_number")]
    pub id: RecordId,
    pub created_at: Timestamp,
    pub candidate_name: String,
    #[serde(default)]
    pub candidate_info: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub answers: Vec<Answer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_video_url: Option<String>,
    #[serde(default)]
    pub evaluation: Evaluation,
}

impl Submission {
    /// Build a fresh record from candidate input. The evaluation starts
    /// `unreviewed` with no rating.
    pub fn new(id: RecordId, created_at: Timestamp, input: NewSubmission) -> Self {
        let candidate_name = input.display_name();
        Self {
            id,
            created_at,
            candidate_name,
            candidate_info: input.candidate_info,
            answers: input.answers,
            merged_video_url: None,
            evaluation: Evaluation::default(),
        }
    }

    /// Media file names referenced by this submission: every answer video in
    /// order, then the merged video.
    pub fn media_file_names(&self) -> Vec<String> {
        self.answers
            .iter()
            .filter_map(|a| a.video_url.as_deref())
            .chain(self.merged_video_url.as_deref())
            .filter_map(file_name_from_url)
            .map(str::to_string)
            .collect()
    }

    /// Answer video file names in answer order (merge inputs).
    pub fn answer_video_file_names(&self) -> Vec<String> {
        self.answers
            .iter()
            .filter_map(|a| a.video_url.as_deref())
            .filter_map(file_name_from_url)
            .map(str::to_string)
            .collect()
    }

    /// Apply a validated patch in place.
    pub fn apply(&mut self, patch: &SubmissionPatch) {
        if let Some(name) = &patch.candidate_name {
            self.candidate_name = name.clone();
        }
        if let Some(eval) = &patch.evaluation {
            if let Some(status) = eval.status {
                self.evaluation.status = status;
            }
            if let Some(rating) = eval.rating {
                self.evaluation.rating = rating;
            }
            if let Some(notes) = &eval.notes {
                self.evaluation.notes = notes.clone();
            }
        }
        if let Some(merged) = &patch.merged_video_url {
            self.merged_video_url = merged.clone();
        }
    }
}

/// Candidate input for `POST /submissions`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubmission {
    #[serde(default)]
    pub candidate_name: Option<String>,
    #[serde(default)]
    pub candidate_info: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

impl NewSubmission {
    /// Resolve the display name for listings.
    ///
    /// Order of preference: an explicit `candidateName`, the first intake key
    /// containing "name" (case-insensitive), the first intake key, then
    /// [`UNKNOWN_CANDIDATE`].
    pub fn display_name(&self) -> String {
        if let Some(name) = self.candidate_name.as_deref() {
            if !name.trim().is_empty() {
                return name.trim().to_string();
            }
        }

        let key = self
            .candidate_info
            .keys()
            .find(|k| k.to_lowercase().contains("name"))
            .or_else(|| self.candidate_info.keys().next());

        key.and_then(|k| self.candidate_info.get(k))
            .and_then(value_as_display)
            .unwrap_or_else(|| UNKNOWN_CANDIDATE.to_string())
    }

    /// Answer videos must point at fresh uploads: `/api/files/<name>` where
    /// `<name>` has the generated upload shape. Merged outputs and arbitrary
    /// names are rejected.
    pub fn validate_media(&self) -> Result<(), CoreError> {
        for answer in &self.answers {
            let Some(url) = answer.video_url.as_deref() else {
                continue;
            };
            let valid = url
                .strip_prefix(FILES_URL_PREFIX)
                .is_some_and(is_upload_name);
            if !valid {
                return Err(CoreError::Validation(format!(
                    "Invalid video reference for question '{}'",
                    answer.question_id
                )));
            }
        }
        Ok(())
    }

    /// File names of the answer videos.
    pub fn video_file_names(&self) -> Vec<&str> {
        self.answers
            .iter()
            .filter_map(|a| a.video_url.as_deref())
            .filter_map(file_name_from_url)
            .collect()
    }
}

/// Partial update of an evaluation. Each field is applied independently so
/// concurrent patches touching different fields do not overwrite each other.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EvaluationPatch {
    #[serde(default)]
    pub status: Option<ReviewStatus>,
    /// `Some(None)` clears the rating. A rating of `0` is treated as a clear.
    #[serde(default, deserialize_with = "rating_patch")]
    pub rating: Option<Option<u8>>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Typed partial update for a submission.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPatch {
    #[serde(default)]
    pub candidate_name: Option<String>,
    #[serde(default)]
    pub evaluation: Option<EvaluationPatch>,
    /// `Some(None)` clears the merged video reference.
    #[serde(default, deserialize_with = "double_option")]
    pub merged_video_url: Option<Option<String>>,
}

impl SubmissionPatch {
    /// Patch that sets or clears only the merged video reference.
    pub fn merged_video(url: Option<String>) -> Self {
        Self {
            merged_video_url: Some(url),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidate_name.is_none() && self.evaluation.is_none() && self.merged_video_url.is_none()
    }

    /// Validate the patch before it is merged into a stored record.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(name) = &self.candidate_name {
            if name.trim().is_empty() {
                return Err(CoreError::Validation(
                    "candidateName must not be empty".into(),
                ));
            }
        }
        if let Some(Some(rating)) = self.evaluation.as_ref().and_then(|e| e.rating) {
            if !(MIN_RATING..=MAX_RATING).contains(&rating) {
                return Err(CoreError::Validation(format!(
                    "rating must be between {MIN_RATING} and {MAX_RATING}"
                )));
            }
        }
        if let Some(Some(url)) = &self.merged_video_url {
            if file_name_from_url(url).is_none() {
                return Err(CoreError::Validation(format!(
                    "mergedVideoUrl '{url}' does not reference a file"
                )));
            }
        }
        Ok(())
    }
}

fn value_as_display(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Stored ratings of `0` (the UI's "unrated") read back as `None`.
fn rating_or_unrated<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<u8>::deserialize(deserializer)?.filter(|r| *r != 0))
}

fn rating_patch<'de, D>(deserializer: D) -> Result<Option<Option<u8>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    rating_or_unrated(deserializer).map(Some)
}
