//! Handlers for the `/terms` resource (site configuration).

use axum::extract::State;
use axum::Json;
use audition_core::site_config::SiteConfig;
use audition_db::repositories::TermsRepo;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/terms
pub async fn get(State(state): State<AppState>) -> AppResult<Json<SiteConfig>> {
    let config = TermsRepo::get(&state.store).await?;
    Ok(Json(config))
}

/// POST /api/terms
///
/// Replace the site configuration and return what was stored.
pub async fn replace(
    State(state): State<AppState>,
    auth_user: AuthUser,
    AppJson(config): AppJson<SiteConfig>,
) -> AppResult<Json<SiteConfig>> {
    TermsRepo::replace(&state.store, &config).await?;
    tracing::info!(user_id = %auth_user.user_id, "Site configuration updated");
    Ok(Json(config))
}
