use std::fmt::Display;
use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

/// Errors raised while reading configuration. The binary fails fast on these.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must differ")]
    SharedSecret,
}

/// Read-only view over a variable source (the process environment in
/// production, a map in tests). Empty values count as unset.
pub struct EnvLookup<'a> {
    get: &'a dyn Fn(&str) -> Option<String>,
}

impl<'a> EnvLookup<'a> {
    pub fn new(get: &'a dyn Fn(&str) -> Option<String>) -> Self {
        Self { get }
    }

    fn value(&self, var: &str) -> Option<String> {
        (self.get)(var)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn required(&self, var: &'static str) -> Result<String, ConfigError> {
        self.value(var).ok_or(ConfigError::Missing(var))
    }

    pub fn or(&self, var: &'static str, default: &str) -> String {
        self.value(var).unwrap_or_else(|| default.to_string())
    }

    pub fn parsed<T>(&self, var: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.value(var) {
            None => Ok(default),
            Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
                var,
                reason: e.to_string(),
            }),
        }
    }

    /// Parse an integer that must lie in `1..=max`.
    pub fn bounded(&self, var: &'static str, default: i64, max: i64) -> Result<i64, ConfigError> {
        let value: i64 = self.parsed(var, default)?;
        if !(1..=max).contains(&value) {
            return Err(ConfigError::Invalid {
                var,
                reason: format!("must be between 1 and {max}"),
            });
        }
        Ok(value)
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the token secrets have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on any single credential store call (default: `5`).
    pub store_timeout_secs: u64,
    /// Mark auth cookies `Secure`. True when `APP_ENV=production`.
    pub cookie_secure: bool,
    /// Token secrets and lifetimes.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `5000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `STORE_TIMEOUT_SECS`   | `5`                        |
    /// | `APP_ENV`              | `development`              |
    ///
    /// Token variables are documented on [`JwtConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let get = |var: &str| std::env::var(var).ok();
        Self::from_lookup(&EnvLookup::new(&get))
    }

    pub fn from_lookup(lookup: &EnvLookup<'_>) -> Result<Self, ConfigError> {
        let host = lookup.or("HOST", "0.0.0.0");
        let port: u16 = lookup.parsed("PORT", 5000)?;

        let cors_origins: Vec<String> = lookup
            .or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = lookup.parsed("REQUEST_TIMEOUT_SECS", 30)?;
        let store_timeout_secs: u64 = lookup.parsed("STORE_TIMEOUT_SECS", 5)?;
        let cookie_secure = lookup.or("APP_ENV", "development") == "production";

        let jwt = JwtConfig::from_lookup(lookup)?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            store_timeout_secs,
            cookie_secure,
            jwt,
        })
    }
}
