//! Session-id cookie extractor.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum_extra::extract::cookie::CookieJar;
use http::request::Parts;
use uuid::Uuid;

use crate::cookie::{BLINDBOX_SESSION, set_session_cookie};

/// Id of the caller's server-side session bag.
///
/// Taken from the `blindbox_session` cookie. A missing or malformed cookie yields a fresh
/// id, so handlers must hand the id back with [`SessionId::store`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    fn parse(value: &str) -> Option<Self> {
        let valid = value.len() == 32 && value.bytes().all(|b| b.is_ascii_hexdigit());
        valid.then(|| Self(value.to_ascii_lowercase()))
    }

    /// Write the id back as a cookie, sliding its Max-Age.
    pub fn store(&self, jar: CookieJar, domain: String) -> CookieJar {
        set_session_cookie(jar, self.0.clone(), domain)
    }
}

impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let jar = CookieJar::from_headers(&parts.headers);
        let session = jar
            .get(BLINDBOX_SESSION)
            .and_then(|c| SessionId::parse(c.value()))
            .unwrap_or_else(SessionId::generate);
        async move { Ok(session) }
    }
}
