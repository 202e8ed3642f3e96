use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::Serialize;

use blindbox_auth_types::session::SessionId;

use crate::error::BlindBoxError;
use crate::state::AppState;
use crate::usecase::theme::toggle_theme;

#[derive(Serialize)]
pub struct ThemeResponse {
    pub theme: &'static str,
}

// ── POST /theme ───────────────────────────────────────────────────────────────

pub async fn toggle(
    State(state): State<AppState>,
    session: SessionId,
    jar: CookieJar,
) -> Result<impl IntoResponse, BlindBoxError> {
    let theme = toggle_theme(&state.session(&session)).await?;
    let jar = session.store(jar, state.cookie_domain.clone());
    Ok((jar, Json(ThemeResponse { theme })))
}
