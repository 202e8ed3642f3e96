//! Cookie builders for the auth tokens and the anonymous session id.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name for the access token.
pub const BLINDBOX_ACCESS_TOKEN: &str = "blindbox_access_token";

/// Cookie name for the refresh token.
pub const BLINDBOX_REFRESH_TOKEN: &str = "blindbox_refresh_token";

/// Cookie name for the server-side session bag id.
pub const BLINDBOX_SESSION: &str = "blindbox_session";

/// Access-token JWT lifetime in seconds (4 hours).
pub const ACCESS_TOKEN_EXP: u64 = 14400;

/// Refresh-token JWT lifetime and auth cookie Max-Age in seconds (7 days).
pub const REFRESH_TOKEN_EXP: u64 = 604800;

/// Session bag lifetime and session cookie Max-Age in seconds (14 days).
pub const SESSION_EXP: u64 = 1_209_600;

/// Path scoping the refresh cookie to the token endpoint.
const REFRESH_TOKEN_PATH: &str = "/auth/token";

fn base_cookie(
    name: &'static str,
    value: String,
    path: &'static str,
    domain: String,
    max_age: Duration,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path(path)
        .domain(domain)
        .max_age(max_age)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Set the access-token cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use blindbox_auth_types::cookie::{set_access_token_cookie, BLINDBOX_ACCESS_TOKEN};
///
/// let jar = CookieJar::new();
/// let jar = set_access_token_cookie(jar, "token_value".to_string(), "example.com".to_string());
/// let cookie = jar.get(BLINDBOX_ACCESS_TOKEN).unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.domain(), Some("example.com"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(604800)));
/// assert!(cookie.http_only().unwrap_or(false));
/// ```
pub fn set_access_token_cookie(jar: CookieJar, value: String, domain: String) -> CookieJar {
    jar.add(base_cookie(
        BLINDBOX_ACCESS_TOKEN,
        value,
        "/",
        domain,
        Duration::seconds(REFRESH_TOKEN_EXP as i64),
    ))
}

/// Set the refresh-token cookie on the jar, scoped to `/auth/token`.
pub fn set_refresh_token_cookie(jar: CookieJar, value: String, domain: String) -> CookieJar {
    jar.add(base_cookie(
        BLINDBOX_REFRESH_TOKEN,
        value,
        REFRESH_TOKEN_PATH,
        domain,
        Duration::seconds(REFRESH_TOKEN_EXP as i64),
    ))
}

/// Set the session-id cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use blindbox_auth_types::cookie::{set_session_cookie, BLINDBOX_SESSION};
///
/// let jar = set_session_cookie(CookieJar::new(), "sid".to_string(), "example.com".to_string());
/// let cookie = jar.get(BLINDBOX_SESSION).unwrap();
/// assert_eq!(cookie.value(), "sid");
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(1_209_600)));
/// ```
pub fn set_session_cookie(jar: CookieJar, session_id: String, domain: String) -> CookieJar {
    jar.add(base_cookie(
        BLINDBOX_SESSION,
        session_id,
        "/",
        domain,
        Duration::seconds(SESSION_EXP as i64),
    ))
}

/// Clear both token cookies by setting Max-Age to 0. The session cookie is left alone.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use blindbox_auth_types::cookie::{
///     clear_cookies, set_access_token_cookie, set_refresh_token_cookie,
///     BLINDBOX_ACCESS_TOKEN, BLINDBOX_REFRESH_TOKEN,
/// };
///
/// let jar = CookieJar::new();
/// let jar = set_access_token_cookie(jar, "a".to_string(), "example.com".to_string());
/// let jar = set_refresh_token_cookie(jar, "r".to_string(), "example.com".to_string());
/// let jar = clear_cookies(jar, "example.com".to_string());
/// let access = jar.get(BLINDBOX_ACCESS_TOKEN).unwrap();
/// let refresh = jar.get(BLINDBOX_REFRESH_TOKEN).unwrap();
/// assert_eq!(access.max_age(), Some(time::Duration::ZERO));
/// assert_eq!(refresh.max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_cookies(jar: CookieJar, domain: String) -> CookieJar {
    let access = base_cookie(
        BLINDBOX_ACCESS_TOKEN,
        String::new(),
        "/",
        domain.clone(),
        Duration::ZERO,
    );
    let refresh = base_cookie(
        BLINDBOX_REFRESH_TOKEN,
        String::new(),
        REFRESH_TOKEN_PATH,
        domain,
        Duration::ZERO,
    );
    jar.add(access).add(refresh)
}
