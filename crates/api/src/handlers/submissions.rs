//! Handlers for the `/submissions` resource.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use audition_core::error::CoreError;
use audition_core::form_schema::validate_candidate_info;
use audition_core::submission::{NewSubmission, Submission, SubmissionPatch};
use audition_db::repositories::{FormSchemaRepo, SubmissionRepo, TermsRepo};

use crate::error::{submission_not_found, AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::{Success, SuccessWith};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SubmissionBody {
    pub submission: Submission,
}

/// GET /api/submissions
pub async fn list(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> AppResult<Json<Vec<Submission>>> {
    let submissions = SubmissionRepo::list(&state.store).await?;
    Ok(Json(submissions))
}

/// POST /api/submissions
///
/// Record a candidate's finished interview. Public: candidates have no
/// session. Required intake fields are checked against the current form.
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<NewSubmission>,
) -> AppResult<Json<SuccessWith<SubmissionBody>>> {
    let schema = FormSchemaRepo::list(&state.store).await?;
    validate_candidate_info(&schema, &input.candidate_info)?;
    check_answer_media(&state, &input).await?;

    let submission = SubmissionRepo::create(&state.store, input).await?;
    tracing::info!(
        submission_id = %submission.id,
        answers = submission.answers.len(),
        "Submission created"
    );

    notify_webhook(&state, &submission).await;

    Ok(Json(SuccessWith::new(SubmissionBody { submission })))
}

/// GET /api/submissions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Submission>> {
    let submission = SubmissionRepo::find_by_id(&state.store, &id)
        .await?
        .ok_or_else(|| submission_not_found(&id))?;
    Ok(Json(submission))
}

/// PUT /api/submissions/{id}
///
/// Apply a partial update (name, evaluation fields, merged video reference).
pub async fn update(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    AppJson(patch): AppJson<SubmissionPatch>,
) -> AppResult<Json<Submission>> {
    patch.validate()?;
    let submission = SubmissionRepo::update(&state.store, &id, &patch)
        .await?
        .ok_or_else(|| submission_not_found(&id))?;
    tracing::info!(user_id = %auth_user.user_id, submission_id = %id, "Submission updated");
    Ok(Json(submission))
}

/// DELETE /api/submissions/{id}
///
/// Remove the record, then its answer videos and merged video.
pub async fn delete(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Success>> {
    let deleted = SubmissionRepo::delete_with_media(&state.store, &id)
        .await?
        .ok_or_else(|| submission_not_found(&id))?;
    tracing::info!(
        user_id = %auth_user.user_id,
        submission_id = %id,
        removed_files = deleted.removed_files.len(),
        "Submission deleted"
    );
    Ok(Json(Success::ok()))
}

/// Answer videos must be fresh uploads that are neither branding assets nor
/// already attached to another submission.
async fn check_answer_media(state: &AppState, input: &NewSubmission) -> AppResult<()> {
    input.validate_media()?;
    let names = input.video_file_names();
    if names.is_empty() {
        return Ok(());
    }

    let site = TermsRepo::get(&state.store).await?;
    if let Some(name) = names.iter().find(|name| site.is_public_asset(name)) {
        tracing::warn!(file = %name, "Rejected branding asset as answer video");
        return Err(media_in_use());
    }
    if let Some(owner) = SubmissionRepo::find_media_owner(&state.store, &names).await? {
        tracing::warn!(owner_id = %owner, "Rejected answer video owned by another submission");
        return Err(media_in_use());
    }
    Ok(())
}

fn media_in_use() -> AppError {
    AppError::Core(CoreError::Validation("Video is already in use".into()))
}

/// Fire the configured new-submission webhook, if any.
///
/// A failure to read the site configuration must not fail the submission.
async fn notify_webhook(state: &AppState, submission: &Submission) {
    match TermsRepo::get(&state.store).await {
        Ok(config) => {
            if let Some(url) = config.webhook() {
                state.notifier.notify_new_submission(url, submission);
            }
        }
        Err(e) => {
            tracing::warn!(submission_id = %submission.id, error = %e, "Could not read webhook configuration");
        }
    }
}
