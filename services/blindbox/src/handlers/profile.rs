use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use blindbox_auth_types::identity::Identity;
use blindbox_domain::profile::Gender;

use crate::domain::types::Profile;
use crate::error::BlindBoxError;
use crate::handlers::view::ProfileCardResponse;
use crate::state::AppState;
use crate::usecase::blind_date::BlindDateUseCase;
use crate::usecase::profile::{EditProfileInput, EditProfileUseCase, GetOwnProfileUseCase};

/// Raw profile row as the owner edits it. Absent fields stay `null`.
#[derive(Serialize)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub nickname: Option<String>,
    pub avatar_url: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub height_cm: Option<i32>,
    pub weight_kg: Option<f64>,
    pub hobbies: Option<String>,
}

impl ProfileResponse {
    fn new(user_id: Uuid, profile: Option<Profile>) -> Self {
        let profile = profile.unwrap_or_else(|| Profile {
            user_id,
            ..Default::default()
        });
        Self {
            user_id,
            nickname: profile.nickname,
            avatar_url: profile.avatar_url,
            age: profile.age,
            gender: profile.gender,
            height_cm: profile.height_cm,
            weight_kg: profile.weight_kg,
            hobbies: profile.hobbies,
        }
    }
}

// ── GET /profile ──────────────────────────────────────────────────────────────

pub async fn get_own_profile(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<ProfileResponse>, BlindBoxError> {
    let usecase = GetOwnProfileUseCase {
        profiles: state.profile_repo(),
    };
    let profile = usecase.execute(identity.user_id).await?;
    Ok(Json(ProfileResponse::new(identity.user_id, profile)))
}

// ── PUT /profile ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct EditProfileRequest {
    pub nickname: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub height_cm: Option<i32>,
    pub weight_kg: Option<f64>,
    pub hobbies: Option<String>,
    pub avatar_url: Option<String>,
}

pub async fn edit_profile(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<EditProfileRequest>,
) -> Result<Json<ProfileResponse>, BlindBoxError> {
    let usecase = EditProfileUseCase {
        profiles: state.profile_repo(),
    };
    let profile = usecase
        .execute(
            identity.user_id,
            EditProfileInput {
                nickname: body.nickname,
                age: body.age,
                gender: body.gender,
                height_cm: body.height_cm,
                weight_kg: body.weight_kg,
                hobbies: body.hobbies,
                avatar_url: body.avatar_url,
            },
        )
        .await?;
    Ok(Json(ProfileResponse::new(identity.user_id, Some(profile))))
}

// ── GET /blind-date ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct BlindDateResponse {
    pub match_user: Option<ProfileCardResponse>,
}

pub async fn blind_date(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<BlindDateResponse>, BlindBoxError> {
    let usecase = BlindDateUseCase {
        users: state.user_repo(),
        profiles: state.profile_repo(),
    };
    let card = usecase.execute(identity.user_id).await?;
    Ok(Json(BlindDateResponse {
        match_user: card.map(ProfileCardResponse::from),
    }))
}
