//! Handlers for the `/notifications` log.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use audition_core::notification::{NewNotification, Notification};
use audition_db::repositories::NotificationRepo;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::SuccessWith;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct NotificationBody {
    pub notification: Notification,
}

/// GET /api/notifications
///
/// Newest first.
pub async fn list(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> AppResult<Json<Vec<Notification>>> {
    let notifications = NotificationRepo::list(&state.store).await?;
    Ok(Json(notifications))
}

/// POST /api/notifications
///
/// Record a message sent to a candidate.
pub async fn create(
    State(state): State<AppState>,
    auth_user: AuthUser,
    AppJson(input): AppJson<NewNotification>,
) -> AppResult<Json<SuccessWith<NotificationBody>>> {
    let notification = NotificationRepo::append(&state.store, input).await?;
    tracing::info!(
        user_id = %auth_user.user_id,
        notification_id = %notification.id,
        "Notification logged"
    );
    Ok(Json(SuccessWith::new(NotificationBody { notification })))
}
