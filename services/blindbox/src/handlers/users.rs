use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use blindbox_auth_types::identity::Identity;
use blindbox_core::serde::to_rfc3339_ms;
use blindbox_domain::user::UserRole;

use crate::domain::types::User;
use crate::error::BlindBoxError;
use crate::handlers::view::{BlogListItem, ProfileCardResponse, UserSummary, blog_list};
use crate::state::AppState;
use crate::usecase::account::ListUsersUseCase;
use crate::usecase::blog::UserBlogsUseCase;
use crate::usecase::profile::GetProfilePageUseCase;

// ── GET /users ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub date_joined: DateTime<Utc>,
    pub is_staff: bool,
    pub is_active: bool,
}

impl From<User> for UserRow {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            date_joined: user.date_joined,
            is_staff: UserRole::from_u8(user.role).is_some_and(UserRole::is_staff),
            is_active: user.is_active,
        }
    }
}

pub async fn list_users(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<UserRow>>, BlindBoxError> {
    let usecase = ListUsersUseCase {
        users: state.user_repo(),
    };
    let users = usecase.execute(identity.user_role).await?;
    Ok(Json(users.into_iter().map(UserRow::from).collect()))
}

// ── GET /users/{id} ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProfilePageResponse {
    pub user: UserSummary,
    pub profile: ProfileCardResponse,
    pub recent_blogs: Vec<BlogListItem>,
    pub blog_count: u64,
    pub comment_count: u64,
    pub is_friend: bool,
    pub friend_request_sent: bool,
    pub is_own_profile: bool,
}

pub async fn get_profile_page(
    State(state): State<AppState>,
    identity: Option<Identity>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ProfilePageResponse>, BlindBoxError> {
    let usecase = GetProfilePageUseCase {
        users: state.user_repo(),
        profiles: state.profile_repo(),
        blogs: state.blog_repo(),
        comments: state.comment_repo(),
        friends: state.friend_repo(),
    };
    let page = usecase
        .execute(user_id, identity.map(|i| i.user_id))
        .await?;
    Ok(Json(ProfilePageResponse {
        user: UserSummary::from(&page.user),
        profile: page.card.into(),
        recent_blogs: blog_list(page.recent_blogs),
        blog_count: page.blog_count,
        comment_count: page.comment_count,
        is_friend: page.is_friend,
        friend_request_sent: page.friend_request_sent,
        is_own_profile: page.is_own_profile,
    }))
}

// ── GET /users/{id}/blogs ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Serialize)]
pub struct UserBlogsResponse {
    pub user: UserSummary,
    pub blogs: Vec<BlogListItem>,
}

pub async fn list_user_blogs(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<UserBlogsResponse>, BlindBoxError> {
    let usecase = UserBlogsUseCase {
        users: state.user_repo(),
        blogs: state.blog_repo(),
    };
    let (user, blogs) = usecase.execute(user_id, query.q).await?;
    Ok(Json(UserBlogsResponse {
        user: UserSummary::from(&user),
        blogs: blog_list(blogs),
    }))
}
