//! Signed session tokens.
//!
//! A login hands out two HS256 JWTs: a short-lived access token read by every
//! authenticated handler and a long-lived refresh token accepted only by the refresh
//! endpoint. The `kind` claim keeps one from standing in for the other.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Caller identity carried by a valid access token.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub user_id: Uuid,
    pub user_role: u8,
    pub access_token_exp: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("expected a {0:?} token")]
    WrongKind(TokenKind),
}

/// `sub` is the user id, `role` the `UserRole` wire value, `exp` seconds since epoch.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub role: u8,
    pub exp: u64,
    pub kind: TokenKind,
}

pub fn sign_token(
    kind: TokenKind,
    user_id: Uuid,
    role: u8,
    exp: u64,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = JwtClaims {
        sub: user_id.to_string(),
        role,
        exp,
        kind,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

fn decode_claims(token: &str, secret: &str, kind: TokenKind) -> Result<(Uuid, JwtClaims), AuthError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.set_required_spec_claims(&["exp", "sub"]);

    let claims = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?
    .claims;

    if claims.kind != kind {
        return Err(AuthError::WrongKind(kind));
    }
    let user_id = claims.sub.parse().map_err(|_| AuthError::Malformed)?;
    Ok((user_id, claims))
}

pub fn validate_access_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
    let (user_id, claims) = decode_claims(token, secret, TokenKind::Access)?;
    Ok(TokenInfo {
        user_id,
        user_role: claims.role,
        access_token_exp: claims.exp,
    })
}

/// Returns the user the refresh token was issued to. The role claim is ignored; the
/// refresh flow reloads the user before issuing new tokens.
pub fn validate_refresh_token(token: &str, secret: &str) -> Result<Uuid, AuthError> {
    decode_claims(token, secret, TokenKind::Refresh).map(|(user_id, _)| user_id)
}
