//! In-process [`CredentialStore`] for tests and local development.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use repcount_core::types::DbId;
use tokio::sync::RwLock;

use crate::models::user::{CreateUser, User};
use crate::store::{CredentialStore, StoreError};

#[derive(Default)]
struct Inner {
    users: HashMap<DbId, User>,
    last_id: DbId,
}

/// A [`CredentialStore`] holding users in a `HashMap` behind one lock.
///
/// Enforces the same unique constraints as the `users` table and performs
/// refresh-token rotation as a compare-and-swap under the write lock.
#[derive(Default)]
pub struct MemoryCredentialStore {
    inner: RwLock<Inner>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;

        for existing in inner.users.values() {
            if existing.username == input.username {
                return Err(StoreError::Conflict("uq_users_username".into()));
            }
            if existing.email == input.email {
                return Err(StoreError::Conflict("uq_users_email".into()));
            }
        }

        inner.last_id += 1;
        let now = Utc::now();
        let user = User {
            id: inner.last_id,
            username: input.username.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            refresh_token: None,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .find(|u| u.refresh_token.as_deref() == Some(token))
            .cloned())
    }

    async fn set_refresh_token(&self, id: DbId, token: Option<&str>) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(false);
        };
        user.refresh_token = token.map(str::to_owned);
        user.updated_at = Utc::now();
        Ok(true)
    }

    async fn rotate_refresh_token(
        &self,
        id: DbId,
        current: &str,
        next: &str,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.users.get_mut(&id) {
            Some(user) if user.refresh_token.as_deref() == Some(current) => {
                user.refresh_token = Some(next.to_owned());
                user.updated_at = Utc::now();
                Ok(true)
            }
            _ => {
                tracing::debug!(user_id = id, "Refresh token no longer matches stored value");
                Ok(false)
            }
        }
    }

    async fn set_password_hash(
        &self,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(false);
        };
        user.password_hash = password_hash.to_owned();
        user.updated_at = Utc::now();
        Ok(true)
    }
}
