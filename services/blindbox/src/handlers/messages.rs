use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use blindbox_auth_types::identity::Identity;

use crate::error::BlindBoxError;
use crate::handlers::view::{MessageResponse, UserSummary};
use crate::state::AppState;
use crate::usecase::message::{
    ListConversationsUseCase, OpenConversationUseCase, SendMessageUseCase,
};

// ── GET /messages ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct InboxResponse {
    pub conversations: Vec<UserSummary>,
    pub unread_count: u64,
}

pub async fn list_conversations(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<InboxResponse>, BlindBoxError> {
    let usecase = ListConversationsUseCase {
        users: state.user_repo(),
        messages: state.message_repo(),
    };
    let (partners, unread_count) = usecase.execute(identity.user_id).await?;
    Ok(Json(InboxResponse {
        conversations: partners.iter().map(UserSummary::from).collect(),
        unread_count,
    }))
}

// ── GET /messages/{user_id} ───────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ConversationResponse {
    pub other: UserSummary,
    pub messages: Vec<MessageResponse>,
    pub is_friend: bool,
    pub sent_count: u64,
    pub message_limit: u64,
    pub can_send: bool,
}

pub async fn open_conversation(
    State(state): State<AppState>,
    identity: Identity,
    Path(other_id): Path<Uuid>,
) -> Result<Json<ConversationResponse>, BlindBoxError> {
    let usecase = OpenConversationUseCase {
        users: state.user_repo(),
        friends: state.friend_repo(),
        messages: state.message_repo(),
    };
    let conversation = usecase.execute(identity.user_id, other_id).await?;
    Ok(Json(ConversationResponse {
        other: UserSummary::from(&conversation.other),
        messages: conversation
            .messages
            .into_iter()
            .map(MessageResponse::from)
            .collect(),
        is_friend: conversation.is_friend,
        sent_count: conversation.sent_count,
        message_limit: conversation.message_limit,
        can_send: conversation.can_send,
    }))
}

// ── POST /messages/{user_id} ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub content: String,
}

pub async fn send_message(
    State(state): State<AppState>,
    identity: Identity,
    Path(receiver_id): Path<Uuid>,
    Json(body): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), BlindBoxError> {
    let usecase = SendMessageUseCase {
        users: state.user_repo(),
        friends: state.friend_repo(),
        messages: state.message_repo(),
    };
    let message = usecase
        .execute(identity.user_id, receiver_id, &body.content)
        .await?;
    Ok((StatusCode::CREATED, Json(message.into())))
}
