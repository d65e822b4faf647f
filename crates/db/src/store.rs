//! The credential store abstraction used by the session manager.

use async_trait::async_trait;
use repcount_core::types::DbId;

use crate::models::user::{CreateUser, User};
use crate::repositories::UserRepo;
use crate::DbPool;

/// PostgreSQL SQLSTATE for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// Errors returned by [`CredentialStore`] implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint (username, email) rejected the write.
    #[error("Duplicate value violates unique constraint: {0}")]
    Conflict(String),

    /// Any other database failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistent user records holding a password digest and at most one live
/// refresh token per user.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Exact, byte-equal lookup on the stored refresh token.
    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<User>, StoreError>;

    /// Unconditionally overwrite or clear the stored refresh token.
    /// Returns `false` if no user has this id.
    async fn set_refresh_token(&self, id: DbId, token: Option<&str>) -> Result<bool, StoreError>;

    /// Atomically replace `current` with `next`. Returns `false` if the
    /// stored value is no longer `current`.
    async fn rotate_refresh_token(
        &self,
        id: DbId,
        current: &str,
        next: &str,
    ) -> Result<bool, StoreError>;

    /// Overwrite the password digest. Returns `false` if no user has this id.
    async fn set_password_hash(&self, id: DbId, password_hash: &str)
        -> Result<bool, StoreError>;
}

/// [`CredentialStore`] backed by the `users` table.
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: DbPool,
}

impl PgCredentialStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn ping(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError> {
        UserRepo::create(&self.pool, input)
            .await
            .map_err(|err| match err {
                sqlx::Error::Database(db_err)
                    if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
                {
                    let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                    StoreError::Conflict(constraint)
                }
                other => StoreError::Database(other),
            })
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }

    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_refresh_token(&self.pool, token).await?)
    }

    async fn set_refresh_token(&self, id: DbId, token: Option<&str>) -> Result<bool, StoreError> {
        Ok(UserRepo::set_refresh_token(&self.pool, id, token).await?)
    }

    async fn rotate_refresh_token(
        &self,
        id: DbId,
        current: &str,
        next: &str,
    ) -> Result<bool, StoreError> {
        Ok(UserRepo::rotate_refresh_token(&self.pool, id, current, next).await?)
    }

    async fn set_password_hash(
        &self,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, StoreError> {
        Ok(UserRepo::set_password_hash(&self.pool, id, password_hash).await?)
    }
}
