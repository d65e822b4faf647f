//! Request-boundary guards, implemented as Axum extractors.
//!
//! - [`auth::AuthUser`] -- Authenticates an access token from the `Authorization` header.
//! - [`refresh::RefreshGuard`] -- Authenticates a refresh token from the JSON body.

pub mod auth;
pub mod refresh;
