use std::sync::Arc;
use std::time::Duration;

use repcount_db::store::CredentialStore;

use crate::auth::jwt::TokenCodec;
use crate::auth::password::prepare_dummy_hash;
use crate::auth::session::SessionManager;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Credential store (PostgreSQL in production, in-memory in tests).
    pub store: Arc<dyn CredentialStore>,
    /// Login / refresh / logout orchestration over `store`.
    pub sessions: Arc<SessionManager>,
    /// Server configuration (accessed by guards and handlers).
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn CredentialStore>, config: ServerConfig) -> Self {
        prepare_dummy_hash();
        let codec = TokenCodec::new(config.jwt.clone());
        let sessions = SessionManager::new(
            Arc::clone(&store),
            codec,
            Duration::from_secs(config.store_timeout_secs),
        );

        Self {
            store,
            sessions: Arc::new(sessions),
            config: Arc::new(config),
        }
    }
}
