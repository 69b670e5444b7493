//! Handlers for `/submissions/{id}/merge`.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use audition_core::submission::Submission;

use crate::error::AppResult;
use crate::handlers::submissions::SubmissionBody;
use crate::middleware::auth::AuthUser;
use crate::response::SuccessWith;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MergeBody {
    pub url: String,
    pub submission: Submission,
}

/// POST /api/submissions/{id}/merge
///
/// Concatenate the answer videos into one file and store its reference.
pub async fn merge(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<SuccessWith<MergeBody>>> {
    tracing::info!(user_id = %auth_user.user_id, submission_id = %id, "Merge requested");
    let outcome = state.merge.merge(&id).await?;
    Ok(Json(SuccessWith::new(MergeBody {
        url: outcome.url,
        submission: outcome.submission,
    })))
}

/// DELETE /api/submissions/{id}/merge
///
/// Remove the merged video file and clear the reference.
pub async fn delete_merged(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<SuccessWith<SubmissionBody>>> {
    let submission = state.merge.delete_merged(&id).await?;
    tracing::info!(user_id = %auth_user.user_id, submission_id = %id, "Merged video deleted");
    Ok(Json(SuccessWith::new(SubmissionBody { submission })))
}
