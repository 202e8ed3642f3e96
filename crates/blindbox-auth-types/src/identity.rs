//! Access-token cookie extractor.

use std::convert::Infallible;

use axum::extract::{FromRef, FromRequestParts, OptionalFromRequestParts};
use axum_extra::extract::cookie::CookieJar;
use http::request::Parts;
use uuid::Uuid;

use blindbox_core::error::AppError;

use crate::cookie::BLINDBOX_ACCESS_TOKEN;
use crate::token::validate_access_token;

/// HMAC secret used to validate access tokens. Provide it from the router state via
/// `FromRef`.
#[derive(Clone)]
pub struct JwtSecret(pub String);

/// Authenticated caller, taken from a valid `blindbox_access_token` cookie.
///
/// As a required extractor it rejects with 401 when the cookie is absent, expired or
/// forged. As `Option<Identity>` it yields `None` for anonymous callers instead.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub user_role: u8,
}

fn identity_from_parts(parts: &Parts, secret: &str) -> Option<Identity> {
    let jar = CookieJar::from_headers(&parts.headers);
    let token = jar.get(BLINDBOX_ACCESS_TOKEN)?;
    let info = validate_access_token(token.value(), secret).ok()?;
    Some(Identity {
        user_id: info.user_id,
        user_role: info.user_role,
    })
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
    JwtSecret: FromRef<S>,
{
    type Rejection = AppError;

    // axum-core 0.5 declares `fn -> impl Future + Send`; resolve synchronously and hand
    // back a 'static future so no borrow of `parts` crosses the await.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = JwtSecret::from_ref(state);
        let identity = identity_from_parts(parts, &secret.0);
        async move { identity.ok_or(AppError::Unauthorized) }
    }
}

impl<S> OptionalFromRequestParts<S> for Identity
where
    S: Send + Sync,
    JwtSecret: FromRef<S>,
{
    type Rejection = Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Option<Self>, Self::Rejection>> + Send {
        let secret = JwtSecret::from_ref(state);
        let identity = identity_from_parts(parts, &secret.0);
        async move { Ok(identity) }
    }
}
