//! `Set-Cookie` values for the token pair issued at login.

use axum::http::header::{InvalidHeaderValue, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};

pub const ACCESS_COOKIE_NAME: &str = "accessToken";
pub const REFRESH_COOKIE_NAME: &str = "refreshToken";

/// Build an `HttpOnly`, `SameSite=Strict` cookie that lives for `max_age_secs`.
pub fn token_cookie(
    name: &str,
    token: &str,
    max_age_secs: i64,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie =
        format!("{name}={token}; Path=/; HttpOnly; SameSite=Strict; Max-Age={max_age_secs}");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Build a cookie that makes the browser drop `name` immediately.
pub fn clear_cookie(name: &str, secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    token_cookie(name, "", 0, secure)
}

/// Headers clearing both auth cookies. Cookie names are static ASCII, so a
/// failure here is skipped rather than surfaced.
pub fn clear_auth_cookies(secure: bool) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for name in [ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME] {
        if let Ok(value) = clear_cookie(name, secure) {
            headers.append(SET_COOKIE, value);
        }
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_cookie_has_strict_flags() {
        let value = token_cookie(ACCESS_COOKIE_NAME, "abc.def.ghi", 900, false).unwrap();
        let s = value.to_str().unwrap();
        assert!(s.starts_with("accessToken=abc.def.ghi;"));
        assert!(s.contains("HttpOnly"));
        assert!(s.contains("SameSite=Strict"));
        assert!(s.contains("Max-Age=900"));
        assert!(!s.contains("Secure"));
    }

    #[test]
    fn secure_flag_is_appended_in_production() {
        let value = token_cookie(REFRESH_COOKIE_NAME, "t", 60, true).unwrap();
        assert!(value.to_str().unwrap().ends_with("; Secure"));
    }

    #[test]
    fn clearing_sets_both_cookies_to_expire() {
        let headers = clear_auth_cookies(false);
        let values: Vec<_> = headers
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(values.len(), 2);
        assert!(values.iter().all(|v| v.contains("Max-Age=0")));
        assert!(values[0].starts_with("accessToken=;"));
        assert!(values[1].starts_with("refreshToken=;"));
    }
}
