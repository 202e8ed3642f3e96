use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::repository::{FriendRepository, MessageRepository, UserRepository};
use crate::domain::types::{MESSAGE_LIMIT, Message, User};
use crate::error::BlindBoxError;

/// Non-friends may send [`MESSAGE_LIMIT`] messages until the receiver replies once.
/// Friends are never limited.
pub async fn can_send(
    friends: &impl FriendRepository,
    messages: &impl MessageRepository,
    sender: Uuid,
    receiver: Uuid,
) -> Result<bool, BlindBoxError> {
    if friends.are_friends(sender, receiver).await? {
        return Ok(true);
    }
    if messages.count_sent(sender, receiver).await? < MESSAGE_LIMIT {
        return Ok(true);
    }
    Ok(messages.count_sent(receiver, sender).await? > 0)
}

// ── SendMessage ──────────────────────────────────────────────────────────────

pub struct SendMessageUseCase<U, F, M>
where
    U: UserRepository,
    F: FriendRepository,
    M: MessageRepository,
{
    pub users: U,
    pub friends: F,
    pub messages: M,
}

impl<U, F, M> SendMessageUseCase<U, F, M>
where
    U: UserRepository,
    F: FriendRepository,
    M: MessageRepository,
{
    pub async fn execute(
        &self,
        sender: Uuid,
        receiver: Uuid,
        content: &str,
    ) -> Result<Message, BlindBoxError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(BlindBoxError::field("content", "This field is required."));
        }
        if sender == receiver {
            return Err(BlindBoxError::field(
                "receiver",
                "You cannot send a message to yourself.",
            ));
        }
        if self.users.find_by_id(receiver).await?.is_none() {
            return Err(BlindBoxError::UserNotFound);
        }
        if !can_send(&self.friends, &self.messages, sender, receiver).await? {
            debug!(sender = %sender, receiver = %receiver, "message quota exceeded");
            return Err(BlindBoxError::MessageQuotaExceeded);
        }

        let message = Message {
            id: Uuid::now_v7(),
            sender_id: sender,
            receiver_id: receiver,
            content: content.to_owned(),
            created_at: Utc::now(),
            is_read: false,
        };
        self.messages.create(&message).await?;
        info!(sender = %sender, receiver = %receiver, "message sent");
        Ok(message)
    }
}

// ── OpenConversation ─────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Conversation {
    pub other: User,
    pub messages: Vec<Message>,
    pub is_friend: bool,
    pub sent_count: u64,
    pub message_limit: u64,
    pub can_send: bool,
}

pub struct OpenConversationUseCase<U, F, M>
where
    U: UserRepository,
    F: FriendRepository,
    M: MessageRepository,
{
    pub users: U,
    pub friends: F,
    pub messages: M,
}

impl<U, F, M> OpenConversationUseCase<U, F, M>
where
    U: UserRepository,
    F: FriendRepository,
    M: MessageRepository,
{
    pub async fn execute(&self, viewer: Uuid, other: Uuid) -> Result<Conversation, BlindBoxError> {
        let other = self
            .users
            .find_by_id(other)
            .await?
            .ok_or(BlindBoxError::UserNotFound)?;

        self.messages.mark_read(other.id, viewer).await?;
        let messages = self.messages.conversation(viewer, other.id).await?;
        let is_friend = self.friends.are_friends(viewer, other.id).await?;
        let sent_count = self.messages.count_sent(viewer, other.id).await?;
        let can_send = can_send(&self.friends, &self.messages, viewer, other.id).await?;

        Ok(Conversation {
            other,
            messages,
            is_friend,
            sent_count,
            message_limit: MESSAGE_LIMIT,
            can_send,
        })
    }
}

// ── ListConversations ────────────────────────────────────────────────────────

pub struct ListConversationsUseCase<U: UserRepository, M: MessageRepository> {
    pub users: U,
    pub messages: M,
}

impl<U: UserRepository, M: MessageRepository> ListConversationsUseCase<U, M> {
    /// Users the caller has exchanged messages with, plus the caller's unread count.
    pub async fn execute(&self, user_id: Uuid) -> Result<(Vec<User>, u64), BlindBoxError> {
        let mut partners = Vec::new();
        for id in self.messages.counterparts(user_id).await? {
            if let Some(user) = self.users.find_by_id(id).await? {
                partners.push(user);
            }
        }
        let unread = self.messages.unread_count(user_id).await?;
        Ok((partners, unread))
    }
}
