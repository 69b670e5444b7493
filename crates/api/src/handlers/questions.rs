//! Handlers for the `/questions` resource.

use axum::extract::State;
use axum::Json;
use audition_core::ordering::MoveRequest;
use audition_core::question::{validate_questions, Question};
use audition_db::repositories::QuestionRepo;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::Success;
use crate::state::AppState;

/// GET /api/questions
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Question>>> {
    let questions = QuestionRepo::list(&state.store).await?;
    Ok(Json(questions))
}

/// POST /api/questions
///
/// Replace the whole question list.
pub async fn replace(
    State(state): State<AppState>,
    auth_user: AuthUser,
    AppJson(questions): AppJson<Vec<Question>>,
) -> AppResult<Json<Success>> {
    validate_questions(&questions)?;
    QuestionRepo::replace_all(&state.store, &questions).await?;
    tracing::info!(user_id = %auth_user.user_id, count = questions.len(), "Questions replaced");
    Ok(Json(Success::ok()))
}

/// POST /api/questions/reorder
///
/// Swap one question with its neighbour and return the new order.
pub async fn reorder(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    AppJson(input): AppJson<MoveRequest>,
) -> AppResult<Json<Vec<Question>>> {
    let questions = QuestionRepo::move_question(&state.store, input.index, input.direction).await?;
    Ok(Json(questions))
}
