//! Interview questions.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{string_or_number, RecordId};
use crate::validation::validate_unique_ids;

/// A single interview prompt. The position in the question list is the
/// display and navigation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(deserialize_with = "string_or_number")]
    pub id: RecordId,
    #[validate(length(min = 1, message = "Question text must not be empty"))]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Answer time limit in seconds; `0` means unlimited.
    #[serde(default)]
    pub time_limit: u32,
}

impl Question {
    pub fn is_unlimited(&self) -> bool {
        self.time_limit == 0
    }
}

/// Validate a full replacement question list.
pub fn validate_questions(questions: &[Question]) -> Result<(), CoreError> {
    for q in questions {
        q.validate()
            .map_err(|e| CoreError::Validation(format!("Question {}: {e}", q.id)))?;
    }
    validate_unique_ids(questions.iter().map(|q| q.id.as_str()), "question")
}
