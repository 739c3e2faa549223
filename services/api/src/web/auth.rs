//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for login, logout and the current-user lookup.
//!
//! Sessions are plain refresh tokens stored server side and carried in an
//! HttpOnly cookie. Accounts are created through `POST /users`, not here.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use dreamlog_core::domain::RefreshTokenDraft;
use dreamlog_core::error::{Entity, Error as CoreError};

use crate::error::{ApiError, ErrorBody};
use crate::web::middleware::{cookie_token, REFRESH_COOKIE};
use crate::web::state::AppState;
use crate::web::users::UserEnvelope;

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

//=========================================================================================
// Password Helpers
//=========================================================================================

/// Hashes a plaintext password with a fresh salt.
pub(crate) fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("failed to hash password: {e}")))
}

/// Checks a plaintext password against a stored hash.
pub(crate) fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

fn session_cookie(token: &str, max_age_seconds: i64) -> String {
    format!(
        "{REFRESH_COOKIE}={token}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={max_age_seconds}"
    )
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/login - Log in with a user name and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = UserEnvelope),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // 1. Look the account up by name
    let creds = state
        .store
        .find_credentials_by_name(&req.name)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    // 2. Verify the password
    if !verify_password(&req.password, &creds.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    // 3. Mint a refresh token
    let ttl = Duration::days(state.config.refresh_token_ttl_days);
    let token = Uuid::new_v4().to_string();
    state
        .store
        .create_refresh_token(RefreshTokenDraft {
            token: token.clone(),
            user: creds.id,
            expires_at: Utc::now() + ttl,
        })
        .await?;

    // 4. Record the connection on the user document
    let mut user = state
        .store
        .find_user(creds.id)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;
    user.last_connection = Utc::now();
    let user = state.store.save_user(user).await?;

    // 5. Return the user with the session cookie set
    let cookie = session_cookie(&token, ttl.num_seconds());
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(UserEnvelope::from(user)),
    ))
}

/// POST /auth/logout - Revoke the current session
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    // Revoke the token if one was sent; logging out twice is fine.
    if let Some(token) = cookie_token(headers.get(header::COOKIE)) {
        state.store.delete_refresh_token(&token).await?;
    }

    let cookie = session_cookie("", 0);
    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)]))
}

/// GET /auth/me - Return the logged-in user
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "The current user", body = UserEnvelope),
        (status = 401, description = "Missing or expired session", body = ErrorBody),
        (status = 404, description = "User no longer exists", body = ErrorBody)
    )
)]
pub async fn me_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .store
        .find_user(user_id)
        .await?
        .ok_or(CoreError::NotFound(Entity::User))?;
    Ok(Json(UserEnvelope::from(user)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_roundtrip_verifies() {
        let hash = hash_password("hunter2-with-length").unwrap();
        assert!(verify_password("hunter2-with-length", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
