//! Route definitions for the `/user` resource.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/user`.
///
/// ```text
/// POST /register         -> register
/// PUT  /change-password  -> change_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(user::register))
        .route("/change-password", put(user::change_password))
}
