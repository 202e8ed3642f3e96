use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use blindbox_auth_types::session::SessionId;

use crate::error::BlindBoxError;
use crate::handlers::auth::logged_in;
use crate::state::AppState;
use crate::usecase::login_code::{
    RequestLoginCodeUseCase, VerifyLoginCodeUseCase, pending_login_email,
};

// ── POST /auth/login-code ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RequestLoginCodeRequest {
    pub email: String,
}

pub async fn request_login_code(
    State(state): State<AppState>,
    session: SessionId,
    jar: CookieJar,
    Json(body): Json<RequestLoginCodeRequest>,
) -> Result<impl IntoResponse, BlindBoxError> {
    let usecase = RequestLoginCodeUseCase {
        users: state.user_repo(),
        cache: state.expiry_store(),
        session: state.session(&session),
        mailer: state.mailer.clone(),
    };
    usecase.execute(&body.email).await?;
    let jar = session.store(jar, state.cookie_domain.clone());
    Ok((StatusCode::ACCEPTED, jar))
}

// ── GET /auth/login-code ──────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct PendingLoginResponse {
    pub email: Option<String>,
}

pub async fn get_pending_login(
    State(state): State<AppState>,
    session: SessionId,
) -> Result<Json<PendingLoginResponse>, BlindBoxError> {
    let email = pending_login_email(&state.session(&session)).await?;
    Ok(Json(PendingLoginResponse { email }))
}

// ── POST /auth/login-code/verify ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyLoginCodeRequest {
    pub code: String,
}

pub async fn verify_login_code(
    State(state): State<AppState>,
    session: SessionId,
    jar: CookieJar,
    Json(body): Json<VerifyLoginCodeRequest>,
) -> Result<impl IntoResponse, BlindBoxError> {
    let usecase = VerifyLoginCodeUseCase {
        users: state.user_repo(),
        cache: state.expiry_store(),
        session: state.session(&session),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase.execute(&body.code).await?;
    let jar = session.store(jar, state.cookie_domain.clone());
    Ok(logged_in(&state.cookie_domain, jar, out, StatusCode::OK))
}
