use axum::http::{header, HeaderMap};

pub const ACCESS_TOKEN: &str = "vynce-access-token";
pub const REFRESH_TOKEN: &str = "vynce-refresh-token";
pub const CODE_VERIFIER: &str = "vynce-code-verifier";

/// Refresh tokens outlive access tokens; GoTrue rotates them on use.
const REFRESH_TOKEN_MAX_AGE: i64 = 60 * 60 * 24 * 30;

pub fn oauth_state_cookie(provider: &str) -> String {
    format!("vynce-oauth-state-{}", provider)
}

/// Look up a cookie value from the request's `Cookie` headers.
pub fn get(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
}

/// Build a `Set-Cookie` value scoped to the whole site.
pub fn set(name: &str, value: &str, max_age: Option<i64>) -> String {
    let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", name, value);
    if let Some(age) = max_age {
        cookie.push_str(&format!("; Max-Age={}", age));
    }
    cookie
}

pub fn remove(name: &str) -> String {
    set(name, "", Some(0))
}

/// Cookies carrying a freshly issued GoTrue session.
pub fn session(access_token: &str, refresh_token: &str, expires_in: i64) -> Vec<String> {
    vec![
        set(ACCESS_TOKEN, access_token, Some(expires_in)),
        set(REFRESH_TOKEN, refresh_token, Some(REFRESH_TOKEN_MAX_AGE)),
    ]
}

pub fn clear_session() -> Vec<String> {
    vec![remove(ACCESS_TOKEN), remove(REFRESH_TOKEN)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(cookies: &[&str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for c in cookies {
            headers.append(header::COOKIE, HeaderValue::from_str(c).unwrap());
        }
        headers
    }

    #[test]
    fn test_get_finds_cookie_among_many() {
        let headers = headers_with(&["a=1; vynce-access-token=tok; b=2"]);
        assert_eq!(get(&headers, ACCESS_TOKEN).as_deref(), Some("tok"));
        assert_eq!(get(&headers, "b").as_deref(), Some("2"));
    }

    #[test]
    fn test_get_across_multiple_headers() {
        let headers = headers_with(&["a=1", "vynce-oauth-state-spotify=xyz"]);
        assert_eq!(
            get(&headers, &oauth_state_cookie("spotify")).as_deref(),
            Some("xyz")
        );
    }

    #[test]
    fn test_get_missing_cookie() {
        let headers = headers_with(&["a=1"]);
        assert_eq!(get(&headers, ACCESS_TOKEN), None);
        assert_eq!(get(&HeaderMap::new(), ACCESS_TOKEN), None);
    }

    #[test]
    fn test_get_does_not_match_prefix() {
        let headers = headers_with(&["vynce-access-token-old=stale"]);
        assert_eq!(get(&headers, ACCESS_TOKEN), None);
    }

    #[test]
    fn test_set_and_remove_attributes() {
        assert_eq!(
            set("n", "v", Some(60)),
            "n=v; Path=/; HttpOnly; SameSite=Lax; Max-Age=60"
        );
        assert_eq!(set("n", "v", None), "n=v; Path=/; HttpOnly; SameSite=Lax");
        assert!(remove("n").ends_with("Max-Age=0"));
    }

    #[test]
    fn test_session_cookies() {
        let cookies = session("access", "refresh", 3600);
        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].starts_with("vynce-access-token=access;"));
        assert!(cookies[0].contains("Max-Age=3600"));
        assert!(cookies[1].starts_with("vynce-refresh-token=refresh;"));
    }
}
