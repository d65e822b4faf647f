//! Signed access/refresh token issuance and verification.
//!
//! Both token classes are HS256-signed JWTs carrying a [`Claims`] payload.
//! Each class has its own secret and lifetime, and the `typ` claim names the
//! class, so a token minted for one class never verifies as the other.
//!
//! Expiry is checked here rather than by `jsonwebtoken` so that the boundary
//! is exact (`now >= exp` is expired, no leeway) and testable with a fixed
//! instant via [`TokenCodec::issue_at`] / [`TokenCodec::verify_at`].

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use repcount_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{ConfigError, EnvLookup};

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;
/// Default refresh token expiry in days.
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 7;
/// Longest accepted access token lifetime (one week).
pub const MAX_ACCESS_EXPIRY_MINS: i64 = 7 * 24 * 60;
/// Longest accepted refresh token lifetime (ten years).
pub const MAX_REFRESH_EXPIRY_DAYS: i64 = 3650;

/// Which of the two token families a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Access,
    Refresh,
}

impl TokenClass {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenClass::Access => "access",
            TokenClass::Refresh => "refresh",
        }
    }
}

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id, in decimal.
    pub sub: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Unique token identifier, so two tokens minted in the same second differ.
    pub jti: String,
    /// Token class, `"access"` or `"refresh"`.
    pub typ: String,
}

/// The verified content of a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: DbId,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token could not be parsed")]
    Malformed,

    #[error("Token signature does not match")]
    InvalidSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// Secrets and lifetimes for both token classes.
#[derive(Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret for access tokens.
    pub access_secret: String,
    /// HMAC-SHA256 secret for refresh tokens. Must differ from `access_secret`.
    pub refresh_secret: String,
    /// Access token lifetime in minutes (default: 15).
    pub access_token_expiry_mins: i64,
    /// Refresh token lifetime in days (default: 7).
    pub refresh_token_expiry_days: i64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_secret", &"<redacted>")
            .field("refresh_secret", &"<redacted>")
            .field("access_token_expiry_mins", &self.access_token_expiry_mins)
            .field("refresh_token_expiry_days", &self.refresh_token_expiry_days)
            .finish()
    }
}

impl JwtConfig {
    /// Load token configuration through `lookup`.
    ///
    /// | Env Var                     | Required | Default |
    /// |-----------------------------|----------|---------|
    /// | `ACCESS_TOKEN_SECRET`       | **yes**  | --      |
    /// | `REFRESH_TOKEN_SECRET`      | **yes**  | --      |
    /// | `ACCESS_TOKEN_EXPIRY_MINS`  | no       | `15`    |
    /// | `REFRESH_TOKEN_EXPIRY_DAYS` | no       | `7`     |
    ///
    /// Lifetimes must lie in `1..=MAX_ACCESS_EXPIRY_MINS` and
    /// `1..=MAX_REFRESH_EXPIRY_DAYS` so every `exp` stays representable.
    pub fn from_lookup(lookup: &EnvLookup<'_>) -> Result<Self, ConfigError> {
        let access_secret = lookup.required("ACCESS_TOKEN_SECRET")?;
        let refresh_secret = lookup.required("REFRESH_TOKEN_SECRET")?;
        if access_secret == refresh_secret {
            return Err(ConfigError::SharedSecret);
        }

        let access_token_expiry_mins =
            lookup.bounded(
                "ACCESS_TOKEN_EXPIRY_MINS",
                DEFAULT_ACCESS_EXPIRY_MINS,
                MAX_ACCESS_EXPIRY_MINS,
            )?;
        let refresh_token_expiry_days =
            lookup.bounded(
                "REFRESH_TOKEN_EXPIRY_DAYS",
                DEFAULT_REFRESH_EXPIRY_DAYS,
                MAX_REFRESH_EXPIRY_DAYS,
            )?;

        Ok(Self {
            access_secret,
            refresh_secret,
            access_token_expiry_mins,
            refresh_token_expiry_days,
        })
    }
}

/// Stateless creator and verifier of access and refresh tokens.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    config: JwtConfig,
}

impl TokenCodec {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    /// Lifetime of tokens of the given class.
    pub fn ttl(&self, class: TokenClass) -> Duration {
        match class {
            TokenClass::Access => Duration::minutes(self.config.access_token_expiry_mins),
            TokenClass::Refresh => Duration::days(self.config.refresh_token_expiry_days),
        }
    }

    fn secret(&self, class: TokenClass) -> &[u8] {
        match class {
            TokenClass::Access => self.config.access_secret.as_bytes(),
            TokenClass::Refresh => self.config.refresh_secret.as_bytes(),
        }
    }

    /// Mint a token of `class` for `user_id`, valid from now.
    pub fn issue(&self, class: TokenClass, user_id: DbId) -> Result<String, TokenError> {
        self.issue_at(class, user_id, Utc::now())
    }

    /// Mint a token of `class` for `user_id` as if issued at `now`.
    pub fn issue_at(
        &self,
        class: TokenClass,
        user_id: DbId,
        now: Timestamp,
    ) -> Result<String, TokenError> {
        let iat = now.timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat,
            exp: iat + self.ttl(class).num_seconds(),
            jti: Uuid::new_v4().to_string(),
            typ: class.as_str().to_string(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret(class)),
        )
        .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token of `class` against the current time.
    pub fn verify(&self, class: TokenClass, token: &str) -> Result<TokenClaims, TokenError> {
        self.verify_at(class, token, Utc::now())
    }

    /// Verify a token of `class` as of `now`.
    pub fn verify_at(
        &self,
        class: TokenClass,
        token: &str,
        now: Timestamp,
    ) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret(class)),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        })?
        .claims;

        // Only reachable if both classes were configured with the same secret.
        if claims.typ != class.as_str() {
            return Err(TokenError::InvalidSignature);
        }

        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        let subject: DbId = claims.sub.parse().map_err(|_| TokenError::Malformed)?;
        let issued_at = DateTime::from_timestamp(claims.iat, 0).ok_or(TokenError::Malformed)?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or(TokenError::Malformed)?;

        Ok(TokenClaims {
            subject,
            issued_at,
            expires_at,
        })
    }
}
