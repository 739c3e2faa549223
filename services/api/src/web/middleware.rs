//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::web::state::AppState;

/// The name of the cookie carrying the refresh token.
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Middleware that validates the refresh token cookie and extracts the user id.
///
/// If valid, inserts the user id into request extensions for handlers to use.
/// If invalid, missing or expired, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // 1. Extract the token from the cookie header
    let token = cookie_token(req.headers().get(header::COOKIE))
        .ok_or(ApiError::InvalidToken)?;

    // 2. Look the token up and check it has not expired
    let session = state
        .store
        .find_refresh_token(&token)
        .await?
        .ok_or(ApiError::InvalidToken)?;
    if session.expires_at <= chrono::Utc::now() {
        return Err(ApiError::InvalidToken);
    }

    // 3. Insert the user id into request extensions
    req.extensions_mut().insert(session.user);

    // 4. Continue to the handler
    Ok(next.run(req).await)
}

/// Pulls the refresh token value out of a `Cookie` header, if present.
pub fn cookie_token(header: Option<&axum::http::HeaderValue>) -> Option<String> {
    let raw = header?.to_str().ok()?;
    raw.split(';').find_map(|c| {
        c.trim()
            .strip_prefix(REFRESH_COOKIE)?
            .strip_prefix('=')
            .map(str::to_owned)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn cookie_token_finds_the_refresh_cookie_among_others() {
        let header = HeaderValue::from_static("theme=dark; refresh_token=abc-123; lang=en");
        assert_eq!(cookie_token(Some(&header)), Some("abc-123".to_string()));
    }

    #[test]
    fn cookie_token_ignores_unrelated_cookies() {
        let header = HeaderValue::from_static("session=xyz");
        assert_eq!(cookie_token(Some(&header)), None);
        assert_eq!(cookie_token(None), None);
    }
}
