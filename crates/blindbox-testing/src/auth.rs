//! Signed auth cookies for router tests.
//!
//! Handlers authenticate through the `blindbox_access_token` cookie. `MockAuth` signs one
//! for a chosen user and role so a test can call protected routes without logging in.

use axum::http::{HeaderMap, HeaderValue, header};
use blindbox_auth_types::cookie::{ACCESS_TOKEN_EXP, BLINDBOX_ACCESS_TOKEN};
use blindbox_auth_types::token::{TokenKind, sign_token};
use uuid::Uuid;

pub struct MockAuth {
    pub user_id: Uuid,
    pub user_role: u8,
}

impl MockAuth {
    pub fn new(user_id: Uuid, user_role: u8) -> Self {
        Self { user_id, user_role }
    }

    pub fn member() -> Self {
        Self::new(Uuid::new_v4(), 0)
    }

    pub fn access_token(&self, secret: &str) -> String {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs();
        sign_token(
            TokenKind::Access,
            self.user_id,
            self.user_role,
            now + ACCESS_TOKEN_EXP,
            secret,
        )
        .unwrap()
    }

    /// A `Cookie` header carrying the access token.
    pub fn headers(&self, secret: &str) -> HeaderMap {
        let cookie = format!("{BLINDBOX_ACCESS_TOKEN}={}", self.access_token(secret));
        let mut map = HeaderMap::new();
        map.insert(header::COOKIE, HeaderValue::from_str(&cookie).unwrap());
        map
    }
}
