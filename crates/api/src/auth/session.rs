//! Login, refresh-token rotation, and logout.
//!
//! The user record holds at most one live refresh token. Login overwrites it,
//! refresh swaps it for a new one in a single conditional update, and logout
//! clears it. A refresh token is honoured only while it is still the stored
//! value AND its signature, expiry, and subject check out.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use repcount_core::error::AuthError;
use repcount_core::types::DbId;
use repcount_db::models::user::{User, UserResponse};
use repcount_db::store::{CredentialStore, StoreError};

use crate::auth::jwt::{TokenClass, TokenCodec};
use crate::auth::password::{burn_verification, hash_password, verify_password};

/// A freshly minted access/refresh token pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: UserResponse,
    pub tokens: TokenPair,
}

/// Orchestrates the session lifecycle against a [`CredentialStore`].
pub struct SessionManager {
    store: Arc<dyn CredentialStore>,
    codec: TokenCodec,
    store_timeout: Duration,
}

impl SessionManager {
    pub fn new(store: Arc<dyn CredentialStore>, codec: TokenCodec, store_timeout: Duration) -> Self {
        Self {
            store,
            codec,
            store_timeout,
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Authenticate by email and password and open a new session.
    ///
    /// Any refresh token previously stored for the user is superseded.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let user = self
            .with_store("find_by_email", self.store.find_by_email(email))
            .await?;

        let Some(user) = user else {
            burn_verification(password);
            tracing::info!("Login rejected: unknown email");
            return Err(AuthError::NotFound);
        };

        let password_valid = verify_password(password, &user.password_hash)
            .map_err(|e| AuthError::Internal(format!("Password verification error: {e}")))?;

        if !password_valid {
            tracing::info!(user_id = user.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.open_session(&user).await?;

        Ok(LoginOutcome {
            user: UserResponse::from(&user),
            tokens,
        })
    }

    /// Issue a token pair for an already-authenticated user and store its
    /// refresh token, overwriting any previous one.
    pub async fn open_session(&self, user: &User) -> Result<TokenPair, AuthError> {
        let tokens = self.mint_pair(user.id)?;

        let stored = self
            .with_store(
                "set_refresh_token",
                self.store
                    .set_refresh_token(user.id, Some(&tokens.refresh_token)),
            )
            .await?;
        if !stored {
            return Err(AuthError::NotFound);
        }

        tracing::info!(user_id = user.id, "Session opened");
        Ok(tokens)
    }

    /// Exchange a refresh token for a new pair, invalidating the presented one.
    pub async fn refresh(&self, presented: &str) -> Result<TokenPair, AuthError> {
        let user = self
            .with_store(
                "find_by_refresh_token",
                self.store.find_by_refresh_token(presented),
            )
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        let claims = self
            .codec
            .verify(TokenClass::Refresh, presented)
            .map_err(|e| {
                tracing::info!(user_id = user.id, error = %e, "Stored refresh token failed verification");
                AuthError::InvalidRefreshToken
            })?;

        if claims.subject != user.id {
            tracing::warn!(
                user_id = user.id,
                subject = claims.subject,
                "Refresh token subject does not match its owner"
            );
            return Err(AuthError::InvalidRefreshToken);
        }

        let tokens = self.mint_pair(user.id)?;

        let rotated = self
            .with_store(
                "rotate_refresh_token",
                self.store
                    .rotate_refresh_token(user.id, presented, &tokens.refresh_token),
            )
            .await?;
        if !rotated {
            tracing::warn!(user_id = user.id, "Refresh token was rotated concurrently");
            return Err(AuthError::InvalidRefreshToken);
        }

        tracing::info!(user_id = user.id, "Refresh token rotated");
        Ok(tokens)
    }

    /// Clear the stored refresh token. Access tokens already issued stay
    /// valid until they expire.
    pub async fn logout(&self, user_id: DbId) -> Result<(), AuthError> {
        let cleared = self
            .with_store("clear_refresh_token", self.store.set_refresh_token(user_id, None))
            .await?;
        if !cleared {
            return Err(AuthError::NotFound);
        }

        tracing::info!(user_id, "Session closed");
        Ok(())
    }

    /// Replace the password of `user_id` after checking `old_password`.
    ///
    /// The stored refresh token is left alone, so the current session
    /// survives the change.
    pub async fn change_password(
        &self,
        user_id: DbId,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let user = self
            .with_store("find_by_id", self.store.find_by_id(user_id))
            .await?
            .ok_or(AuthError::NotFound)?;

        let old_valid = verify_password(old_password, &user.password_hash)
            .map_err(|e| AuthError::Internal(format!("Password verification error: {e}")))?;
        if !old_valid {
            tracing::info!(user_id, "Password change rejected: wrong old password");
            return Err(AuthError::InvalidCredentials);
        }

        let new_hash = hash_password(new_password)
            .map_err(|e| AuthError::Internal(format!("Password hashing error: {e}")))?;
        let updated = self
            .with_store(
                "set_password_hash",
                self.store.set_password_hash(user_id, &new_hash),
            )
            .await?;
        if !updated {
            return Err(AuthError::NotFound);
        }

        tracing::info!(user_id, "Password changed");
        Ok(())
    }

    fn mint_pair(&self, user_id: DbId) -> Result<TokenPair, AuthError> {
        let access_token = self
            .codec
            .issue(TokenClass::Access, user_id)
            .map_err(|e| AuthError::Internal(format!("Token generation error: {e}")))?;
        let refresh_token = self
            .codec
            .issue(TokenClass::Refresh, user_id)
            .map_err(|e| AuthError::Internal(format!("Token generation error: {e}")))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Run a store call under the configured timeout and hand its own result
    /// back untouched. Only an elapsed timeout becomes [`AuthError::Internal`].
    ///
    /// For callers outside the session lifecycle that must still see store
    /// errors such as [`StoreError::Conflict`].
    pub async fn bounded<T, F>(
        &self,
        op: &'static str,
        call: F,
    ) -> Result<Result<T, StoreError>, AuthError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        tokio::time::timeout(self.store_timeout, call)
            .await
            .map_err(|_| {
                AuthError::Internal(format!(
                    "{op} timed out after {:?}",
                    self.store_timeout
                ))
            })
    }

    /// Run one store call under the configured timeout, folding store errors
    /// and timeouts into [`AuthError::Internal`].
    async fn with_store<T, F>(&self, op: &'static str, call: F) -> Result<T, AuthError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        self.bounded(op, call)
            .await?
            .map_err(|e| AuthError::Internal(format!("{op} failed: {e}")))
    }
}
