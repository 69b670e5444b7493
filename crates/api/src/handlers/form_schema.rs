//! Handlers for the `/form-schema` resource (candidate intake fields).

use axum::extract::State;
use axum::Json;
use audition_core::form_schema::{validate_form_schema, FormField};
use audition_core::ordering::MoveRequest;
use audition_db::repositories::FormSchemaRepo;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/form-schema
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<FormField>>> {
    let fields = FormSchemaRepo::list(&state.store).await?;
    Ok(Json(fields))
}

/// POST /api/form-schema
///
/// Replace the intake form and echo the stored fields.
pub async fn replace(
    State(state): State<AppState>,
    auth_user: AuthUser,
    AppJson(fields): AppJson<Vec<FormField>>,
) -> AppResult<Json<Vec<FormField>>> {
    validate_form_schema(&fields)?;
    FormSchemaRepo::replace_all(&state.store, &fields).await?;
    tracing::info!(user_id = %auth_user.user_id, count = fields.len(), "Form schema replaced");
    Ok(Json(fields))
}

/// POST /api/form-schema/reorder
pub async fn reorder(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    AppJson(input): AppJson<MoveRequest>,
) -> AppResult<Json<Vec<FormField>>> {
    let fields = FormSchemaRepo::move_field(&state.store, input.index, input.direction).await?;
    Ok(Json(fields))
}
