use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use blindbox_domain::friend::{FriendAction, FriendStatus};

use crate::domain::repository::{FriendRepository, UserRepository};
use crate::domain::types::FriendEdge;
use crate::error::BlindBoxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRequestOutcome {
    Created,
    AlreadyExists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespondOutcome {
    Accepted,
    Rejected,
}

// ── SendFriendRequest ────────────────────────────────────────────────────────

pub struct SendFriendRequestUseCase<U: UserRepository, F: FriendRepository> {
    pub users: U,
    pub friends: F,
}

impl<U: UserRepository, F: FriendRepository> SendFriendRequestUseCase<U, F> {
    pub async fn execute(&self, from: Uuid, to: Uuid) -> Result<SendRequestOutcome, BlindBoxError> {
        if from == to {
            return Err(BlindBoxError::CannotBefriendSelf);
        }
        if self.users.find_by_id(to).await?.is_none() {
            return Err(BlindBoxError::UserNotFound);
        }
        if self.friends.find_edge(from, to).await?.is_some() {
            return Ok(SendRequestOutcome::AlreadyExists);
        }

        let edge = FriendEdge {
            id: Uuid::now_v7(),
            from_user_id: from,
            to_user_id: to,
            status: FriendStatus::Pending,
            created_at: Utc::now(),
        };
        // A concurrent request for the same pair loses on the unique index.
        if !self.friends.create(&edge).await? {
            return Ok(SendRequestOutcome::AlreadyExists);
        }
        info!(from = %from, to = %to, "friend request sent");
        Ok(SendRequestOutcome::Created)
    }
}

// ── RespondToFriendRequest ───────────────────────────────────────────────────

pub struct RespondToFriendRequestUseCase<F: FriendRepository> {
    pub friends: F,
}

impl<F: FriendRepository> RespondToFriendRequestUseCase<F> {
    pub async fn execute(
        &self,
        request_id: Uuid,
        responder: Uuid,
        action: FriendAction,
    ) -> Result<RespondOutcome, BlindBoxError> {
        let edge = match self.friends.find_by_id(request_id).await? {
            Some(edge) if edge.to_user_id == responder => edge,
            Some(_) => {
                debug!(request_id = %request_id, responder = %responder, "friend request addressed to someone else");
                return Err(BlindBoxError::FriendRequestNotFound);
            }
            None => return Err(BlindBoxError::FriendRequestNotFound),
        };

        match action {
            FriendAction::Accept => {
                self.friends.accept(edge.id).await?;
                info!(request_id = %edge.id, "friend request accepted");
                Ok(RespondOutcome::Accepted)
            }
            FriendAction::Reject => {
                self.friends.delete(edge.id).await?;
                info!(request_id = %edge.id, "friend request rejected");
                Ok(RespondOutcome::Rejected)
            }
        }
    }
}

// ── ListPendingRequests ──────────────────────────────────────────────────────

pub struct ListPendingRequestsUseCase<F: FriendRepository> {
    pub friends: F,
}

impl<F: FriendRepository> ListPendingRequestsUseCase<F> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<FriendEdge>, BlindBoxError> {
        self.friends.list_pending_to(user_id).await
    }
}

/// Counterpart ids of every accepted edge touching `user_id`.
pub async fn friend_ids(friends: &impl FriendRepository, user_id: Uuid) -> Result<Vec<Uuid>, BlindBoxError> {
    Ok(friends
        .list_accepted(user_id)
        .await?
        .iter()
        .map(|edge| edge.counterpart(user_id))
        .collect())
}
