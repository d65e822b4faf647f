//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- access/refresh token issuance and verification.
//! - [`session`] -- login, refresh-token rotation, and logout.
//! - [`cookies`] -- `Set-Cookie` values for the issued token pair.

pub mod cookies;
pub mod jwt;
pub mod password;
pub mod session;
