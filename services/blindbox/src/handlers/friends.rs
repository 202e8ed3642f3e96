use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use blindbox_auth_types::identity::Identity;
use blindbox_core::serde::to_rfc3339_ms;
use blindbox_domain::friend::{FriendAction, FriendStatus};

use crate::domain::types::FriendEdge;
use crate::error::BlindBoxError;
use crate::state::AppState;
use crate::usecase::friend::{
    ListPendingRequestsUseCase, RespondOutcome, RespondToFriendRequestUseCase, SendRequestOutcome,
    SendFriendRequestUseCase,
};

#[derive(Serialize)]
pub struct OutcomeResponse {
    pub outcome: &'static str,
}

// ── POST /friends/requests/{user_id} ──────────────────────────────────────────

pub async fn send_request(
    State(state): State<AppState>,
    identity: Identity,
    Path(to_user_id): Path<Uuid>,
) -> Result<(StatusCode, Json<OutcomeResponse>), BlindBoxError> {
    let usecase = SendFriendRequestUseCase {
        users: state.user_repo(),
        friends: state.friend_repo(),
    };
    let response = match usecase.execute(identity.user_id, to_user_id).await? {
        SendRequestOutcome::Created => (StatusCode::CREATED, "created"),
        SendRequestOutcome::AlreadyExists => (StatusCode::OK, "already_exists"),
    };
    Ok((response.0, Json(OutcomeResponse { outcome: response.1 })))
}

// ── GET /friends/requests ─────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct FriendRequestResponse {
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub status: FriendStatus,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<FriendEdge> for FriendRequestResponse {
    fn from(edge: FriendEdge) -> Self {
        Self {
            id: edge.id,
            from_user_id: edge.from_user_id,
            to_user_id: edge.to_user_id,
            status: edge.status,
            created_at: edge.created_at,
        }
    }
}

pub async fn list_pending_requests(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<FriendRequestResponse>>, BlindBoxError> {
    let usecase = ListPendingRequestsUseCase {
        friends: state.friend_repo(),
    };
    let edges = usecase.execute(identity.user_id).await?;
    Ok(Json(edges.into_iter().map(FriendRequestResponse::from).collect()))
}

// ── POST /friends/requests/{request_id}/{action} ──────────────────────────────

pub async fn respond_to_request(
    State(state): State<AppState>,
    identity: Identity,
    Path((request_id, action)): Path<(Uuid, FriendAction)>,
) -> Result<Json<OutcomeResponse>, BlindBoxError> {
    let usecase = RespondToFriendRequestUseCase {
        friends: state.friend_repo(),
    };
    let outcome = match usecase
        .execute(request_id, identity.user_id, action)
        .await?
    {
        RespondOutcome::Accepted => "accepted",
        RespondOutcome::Rejected => "rejected",
    };
    Ok(Json(OutcomeResponse { outcome }))
}
