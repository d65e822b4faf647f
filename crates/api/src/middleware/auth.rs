//! Access-token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use repcount_core::error::AuthError;
use repcount_core::types::DbId;

use crate::auth::jwt::TokenClass;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from the access token in the `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
///
/// Only the token is checked; the credential store is never consulted, so a
/// token stays usable until it expires even after logout.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from the token subject).
    pub user_id: DbId,
}

/// Strip a leading `"Bearer "` if present; otherwise use the header as-is.
pub fn bearer_token(header: &str) -> &str {
    match header.strip_prefix("Bearer ") {
        Some(token) => token.trim(),
        None => header,
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::Unauthorized)?;

        let token = bearer_token(auth_header);

        let claims = state
            .sessions
            .codec()
            .verify(TokenClass::Access, token)
            .map_err(|e| {
                tracing::debug!(error = %e, "Access token rejected");
                AuthError::Unauthorized
            })?;

        Ok(AuthUser {
            user_id: claims.subject,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_prefix_is_stripped() {
        assert_eq!(bearer_token("Bearer abc.def"), "abc.def");
        assert_eq!(bearer_token("Bearer   abc.def  "), "abc.def");
    }

    #[test]
    fn raw_header_is_used_as_is() {
        assert_eq!(bearer_token("abc.def"), "abc.def");
        assert_eq!(bearer_token("bearer abc"), "bearer abc");
    }
}
