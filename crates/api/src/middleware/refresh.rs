//! Refresh-token gate in front of the refresh endpoint.

use axum::extract::{FromRequest, Request};
use axum::Json;
use repcount_core::error::AuthError;
use repcount_core::types::DbId;
use serde::Deserialize;

use crate::auth::jwt::TokenClass;
use crate::error::AppError;
use crate::state::AppState;

/// Request body for `POST /auth/refresh-token`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    #[serde(rename = "refreshToken", default)]
    pub refresh_token: Option<String>,
}

/// A refresh token read from the JSON body whose signature and expiry check out.
///
/// Any failure (unreadable body, missing token, bad token) rejects with 403.
/// This is a signature check only: whether the token is still the user's
/// stored one is decided by [`SessionManager::refresh`].
///
/// [`SessionManager::refresh`]: crate::auth::session::SessionManager::refresh
#[derive(Debug, Clone)]
pub struct RefreshGuard {
    pub user_id: DbId,
    pub token: String,
}

impl FromRequest<AppState> for RefreshGuard {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<RefreshRequest>::from_request(req, state)
            .await
            .map_err(|_| AuthError::Forbidden)?;

        let token = body
            .refresh_token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::Forbidden)?;

        let claims = state
            .sessions
            .codec()
            .verify(TokenClass::Refresh, &token)
            .map_err(|e| {
                tracing::debug!(error = %e, "Refresh token rejected at the gate");
                AuthError::Forbidden
            })?;

        Ok(RefreshGuard {
            user_id: claims.subject,
            token,
        })
    }
}
