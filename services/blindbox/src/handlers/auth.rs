use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use blindbox_auth_types::{
    cookie::{BLINDBOX_REFRESH_TOKEN, clear_cookies, set_access_token_cookie, set_refresh_token_cookie},
    identity::Identity,
};

use crate::error::BlindBoxError;
use crate::state::AppState;
use crate::usecase::account::{PasswordLoginUseCase, RegisterInput, RegisterUseCase};
use crate::usecase::login_code::LoginOutput;
use crate::usecase::token::{IssuedTokens, RefreshTokenUseCase};

const X_BLINDBOX_ACCESS_TOKEN_EXPIRES: &str = "x-blindbox-access-token-expires";

fn token_headers(exp: u64) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(X_BLINDBOX_ACCESS_TOKEN_EXPIRES),
        HeaderValue::from(exp),
    );
    headers
}

fn set_token_cookies(jar: CookieJar, tokens: IssuedTokens, domain: &str) -> CookieJar {
    let jar = set_access_token_cookie(jar, tokens.access_token, domain.to_owned());
    set_refresh_token_cookie(jar, tokens.refresh_token, domain.to_owned())
}

#[derive(Serialize)]
pub struct LoggedInResponse {
    pub user_id: Uuid,
    pub username: String,
    pub access_token_exp: u64,
}

/// Cookies, expiry header and body shared by every successful login.
pub(crate) fn logged_in(
    cookie_domain: &str,
    jar: CookieJar,
    out: LoginOutput,
    status: StatusCode,
) -> Response {
    let body = LoggedInResponse {
        user_id: out.user.id,
        username: out.user.username,
        access_token_exp: out.tokens.access_token_exp,
    };
    let headers = token_headers(out.tokens.access_token_exp);
    let jar = set_token_cookies(jar, out.tokens, cookie_domain);
    (status, jar, headers, Json(body)).into_response()
}

// ── POST /auth/register ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, BlindBoxError> {
    let usecase = RegisterUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase
        .execute(RegisterInput {
            username: body.username,
            email: body.email,
            password1: body.password1,
            password2: body.password2,
        })
        .await?;
    Ok(logged_in(&state.cookie_domain, jar, out, StatusCode::CREATED))
}

// ── POST /auth/login ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct PasswordLoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn password_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<PasswordLoginRequest>,
) -> Result<impl IntoResponse, BlindBoxError> {
    let usecase = PasswordLoginUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase.execute(&body.username, &body.password).await?;
    Ok(logged_in(&state.cookie_domain, jar, out, StatusCode::OK))
}

// ── PATCH /auth/token ─────────────────────────────────────────────────────────

pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, BlindBoxError> {
    let refresh_value = jar
        .get(BLINDBOX_REFRESH_TOKEN)
        .map(|c| c.value().to_owned())
        .ok_or(BlindBoxError::InvalidRefreshToken)?;

    let usecase = RefreshTokenUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let tokens = usecase.execute(&refresh_value).await?;

    let headers = token_headers(tokens.access_token_exp);
    let jar = set_token_cookies(jar, tokens, &state.cookie_domain);
    Ok((StatusCode::CREATED, jar, headers))
}

// ── DELETE /auth/token ────────────────────────────────────────────────────────

pub async fn logout(
    State(state): State<AppState>,
    _identity: Identity,
    jar: CookieJar,
) -> impl IntoResponse {
    let jar = clear_cookies(jar, state.cookie_domain.clone());
    (StatusCode::NO_CONTENT, jar)
}
