//! Handlers for the `/auth` resource (login, refresh-token, logout).

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::Json;
use repcount_db::models::user::UserResponse;
use serde::{Deserialize, Serialize};

use crate::auth::cookies::{clear_auth_cookies, token_cookie, ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME};
use crate::auth::jwt::TokenClass;
use crate::auth::session::TokenPair;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::refresh::RefreshGuard;
use crate::response::MessageResponse;
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

/// Successful login response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}

/// Successful refresh response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<TokenPair> for TokenPairResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Authenticate with email + password. Returns both tokens in the body and
/// as `HttpOnly` cookies.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<(HeaderMap, Json<LoginResponse>)> {
    let Json(input) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    if input.email.trim().is_empty() || input.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".into(),
        ));
    }

    let outcome = state.sessions.login(&input.email, &input.password).await?;
    let headers = token_cookies(&state, &outcome.tokens)?;

    Ok((
        headers,
        Json(LoginResponse {
            user: outcome.user,
            access_token: outcome.tokens.access_token,
            refresh_token: outcome.tokens.refresh_token,
        }),
    ))
}

/// POST /api/auth/refresh-token
///
/// Exchange a valid refresh token for a new access + refresh pair. The
/// presented refresh token is unusable afterwards.
pub async fn refresh_token(
    State(state): State<AppState>,
    guard: RefreshGuard,
) -> AppResult<Json<TokenPairResponse>> {
    tracing::debug!(user_id = guard.user_id, "Refresh requested");
    let tokens = state.sessions.refresh(&guard.token).await?;
    Ok(Json(tokens.into()))
}

/// POST /api/auth/logout
///
/// Clear the authenticated user's refresh token and both auth cookies.
pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<(HeaderMap, Json<MessageResponse>)> {
    state.sessions.logout(auth_user.user_id).await?;

    Ok((
        clear_auth_cookies(state.config.cookie_secure),
        Json(MessageResponse {
            message: "Logout successful",
        }),
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `Set-Cookie` headers for both tokens, each living as long as its token.
fn token_cookies(state: &AppState, tokens: &TokenPair) -> AppResult<HeaderMap> {
    let codec = state.sessions.codec();
    let secure = state.config.cookie_secure;
    let mut headers = HeaderMap::new();

    for (name, token, class) in [
        (ACCESS_COOKIE_NAME, &tokens.access_token, TokenClass::Access),
        (REFRESH_COOKIE_NAME, &tokens.refresh_token, TokenClass::Refresh),
    ] {
        let cookie = token_cookie(name, token, codec.ttl(class).num_seconds(), secure)
            .map_err(|e| AppError::InternalError(format!("Cookie header error: {e}")))?;
        headers.append(SET_COOKIE, cookie);
    }

    Ok(headers)
}
