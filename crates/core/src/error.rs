/// Domain rule violations detected before any store call.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Failure kinds produced by the session manager and the request guards.
///
/// The user-facing variants carry no detail on purpose: they are converted to
/// fixed HTTP messages. [`AuthError::Internal`] carries the underlying cause
/// for logging only; it is never sent to the client.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No user matches the supplied identity.
    #[error("User not found")]
    NotFound,

    /// The password did not match the stored digest.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, or expired access token at the access guard.
    #[error("Invalid or expired access token")]
    Unauthorized,

    /// Missing, malformed, or expired refresh token at the refresh guard.
    #[error("Invalid or expired refresh token")]
    Forbidden,

    /// The refresh token failed the store match, the signature check, or lost
    /// a rotation race inside the session manager.
    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    /// Store unavailable, store timeout, or token signing failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Short machine-readable code used in JSON error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::NotFound => "NOT_FOUND",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::Unauthorized => "UNAUTHORIZED",
            AuthError::Forbidden => "FORBIDDEN",
            AuthError::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
