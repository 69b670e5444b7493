//! Candidate notification log.

use serde::{Deserialize, Serialize};

use crate::types::{RecordId, Timestamp};

/// A logged notification, newest first in the stored list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: RecordId,
    pub sent_at: Timestamp,
    #[serde(flatten)]
    pub message: NewNotification,
}

/// Input for `POST /notifications`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<RecordId>,
}
