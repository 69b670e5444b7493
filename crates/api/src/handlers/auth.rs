//! Handlers for the `/auth` resource (login, logout, change-password).

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use audition_core::error::CoreError;
use audition_core::user::{User, UserInfo};
use audition_db::repositories::UserRepo;

use crate::auth::cookie::{clear_session_cookie, session_cookie};
use crate::auth::jwt::generate_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_user_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::rate_limit::ClientKey;
use crate::response::{Success, SuccessWith};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for `PUT /auth/change-password`.
///
/// `email` is accepted for older admin clients; when present it must belong
/// to the signed-in account.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginBody {
    pub user: UserInfo,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Verify email + password and set the `admin_token` session cookie.
pub async fn login(
    State(state): State<AppState>,
    ClientKey(client): ClientKey,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    // 1. Throttle by client address before touching the user store.
    if !state.login_limiter.allow(&client).await {
        tracing::warn!(client = %client, "Login rate limit exceeded");
        return Err(AppError::RateLimited {
            retry_after_secs: state.login_limiter.retry_after_secs(),
        });
    }

    if input.email.trim().is_empty() || input.password.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Email and password are required".into(),
        )));
    }

    // 2. Find the account and verify the password.
    let user = UserRepo::find_by_email(&state.store, &input.email)
        .await?
        .ok_or_else(invalid_credentials)?;

    let password_valid = verify_user_password(&input.password, &user)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(email = %input.email, "Login failed");
        return Err(invalid_credentials());
    }

    // 3. Replace a legacy salted hash now that we know the plaintext.
    if user.salt.is_some() {
        upgrade_legacy_hash(&state, &user, &input.password).await;
    }

    // 4. Issue the session.
    let token = generate_token(&user, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let cookie = session_cookie(
        &token,
        state.config.jwt.expiry_secs(),
        state.config.cookie_secure,
    );

    tracing::info!(user_id = %user.id, "Admin signed in");
    Ok((
        [(SET_COOKIE, cookie)],
        Json(SuccessWith::new(LoginBody {
            user: UserInfo::from(&user),
        })),
    ))
}

/// POST /api/auth/logout
///
/// Clear the session cookie. Tokens are stateless, so nothing is revoked.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(SET_COOKIE, clear_session_cookie(state.config.cookie_secure))],
        Json(Success::ok()),
    )
}

/// PUT /api/auth/change-password
///
/// Verify the current password of the signed-in admin and store a new one.
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    AppJson(input): AppJson<ChangePasswordRequest>,
) -> AppResult<Json<Success>> {
    if input.current_password.is_empty() || input.new_password.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "All fields are required".into(),
        )));
    }

    if let Some(email) = input.email.as_deref().map(str::trim) {
        if !email.is_empty() && !email.eq_ignore_ascii_case(&auth_user.email) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Cannot change another account's password".into(),
            )));
        }
    }

    let user = UserRepo::find_by_id(&state.store, &auth_user.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    let current_valid = verify_user_password(&input.current_password, &user)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Current password is incorrect".into(),
        )));
    }

    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let new_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    UserRepo::set_password_hash(&state.store, &user.id, new_hash)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    tracing::info!(user_id = %user.id, "Admin password changed");
    Ok(Json(Success::ok()))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
}

/// Re-hash a legacy account with Argon2, logging failures.
async fn upgrade_legacy_hash(state: &AppState, user: &User, password: &str) {
    let hash = match hash_password(password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to hash password for upgrade");
            return;
        }
    };
    match UserRepo::set_password_hash(&state.store, &user.id, hash).await {
        Ok(_) => tracing::info!(user_id = %user.id, "Upgraded legacy password hash"),
        Err(e) => {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to store upgraded password hash")
        }
    }
}
