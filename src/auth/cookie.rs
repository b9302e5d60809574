//! Session cookie plumbing: the token rides an http-only cookie named
//! `token`, scoped to `/`, with Max-Age matching the token expiry.

use std::time::Duration;

use axum::http::{HeaderMap, HeaderValue};

pub const TOKEN_COOKIE: &str = "token";

/// Set-Cookie value carrying a freshly signed session token.
pub fn session_cookie(token: &str, max_age: Duration) -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{}={}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
        TOKEN_COOKIE,
        token,
        max_age.as_secs()
    ))
    .unwrap()
}

/// Set-Cookie value that clears the session: empty value, Max-Age=0.
pub fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax",
        TOKEN_COOKIE
    ))
    .unwrap()
}

/// Picks a named cookie out of the request's Cookie header, if present.
pub fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie = headers.get("cookie").or_else(|| headers.get("Cookie"))?;
    let s = cookie.to_str().ok()?;
    for part in s.split(';') {
        let p = part.trim();
        if let Some(eq) = p.find('=') {
            let (k, v) = p.split_at(eq);
            if k == name {
                return Some(v[1..].to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_is_http_only_with_seven_day_max_age() {
        let v = session_cookie("abc.def.ghi", Duration::from_secs(604_800));
        let s = v.to_str().unwrap();
        assert!(s.starts_with("token=abc.def.ghi;"));
        assert!(s.contains("HttpOnly"));
        assert!(s.contains("Path=/"));
        assert!(s.contains("Max-Age=604800"));
    }

    #[test]
    fn clearing_cookie_has_empty_value_and_zero_max_age() {
        let s = clear_session_cookie();
        let s = s.to_str().unwrap();
        assert!(s.starts_with("token=;"));
        assert!(s.contains("Max-Age=0"));
    }

    #[test]
    fn parse_picks_token_out_of_multi_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "cookie",
            HeaderValue::from_static("theme=dark; token=tok123; lang=en"),
        );
        assert_eq!(parse_cookie(&headers, TOKEN_COOKIE).as_deref(), Some("tok123"));
        assert_eq!(parse_cookie(&headers, "lang").as_deref(), Some("en"));
        assert!(parse_cookie(&headers, "absent").is_none());
    }

    #[test]
    fn parse_returns_none_without_cookie_header() {
        assert!(parse_cookie(&HeaderMap::new(), TOKEN_COOKIE).is_none());
    }
}
