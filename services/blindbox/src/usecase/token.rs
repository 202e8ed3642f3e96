use std::time::{SystemTime, UNIX_EPOCH};

use blindbox_auth_types::cookie::{ACCESS_TOKEN_EXP, REFRESH_TOKEN_EXP};
use blindbox_auth_types::token::{TokenKind, sign_token, validate_refresh_token};

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::BlindBoxError;

/// Access and refresh token pair for one user.
#[derive(Debug)]
pub struct IssuedTokens {
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn sign(kind: TokenKind, user: &User, exp: u64, secret: &str) -> Result<String, BlindBoxError> {
    sign_token(kind, user.id, user.role, exp, secret).map_err(|e| BlindBoxError::Internal(e.into()))
}

/// Sign a fresh access/refresh pair. This is what "logging in" means for every flow.
pub fn issue_tokens(user: &User, secret: &str) -> Result<IssuedTokens, BlindBoxError> {
    let now = now_secs();
    let access_token_exp = now + ACCESS_TOKEN_EXP;
    Ok(IssuedTokens {
        access_token: sign(TokenKind::Access, user, access_token_exp, secret)?,
        access_token_exp,
        refresh_token: sign(TokenKind::Refresh, user, now + REFRESH_TOKEN_EXP, secret)?,
    })
}

// ── RefreshToken ─────────────────────────────────────────────────────────────

pub struct RefreshTokenUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
}

impl<U: UserRepository> RefreshTokenUseCase<U> {
    pub async fn execute(&self, refresh_token_value: &str) -> Result<IssuedTokens, BlindBoxError> {
        let user_id = validate_refresh_token(refresh_token_value, &self.jwt_secret)
            .map_err(|_| BlindBoxError::InvalidRefreshToken)?;

        // Role and activation may have changed since the token was issued.
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or(BlindBoxError::InvalidRefreshToken)?;

        issue_tokens(&user, &self.jwt_secret)
    }
}
