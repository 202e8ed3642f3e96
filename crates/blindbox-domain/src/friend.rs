//! Friend relationship domain types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// State of a directed friend edge. Rejected requests are deleted, not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendStatus {
    Pending,
    Accepted,
}

impl FriendStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown friend status: {0}")]
pub struct UnknownFriendStatus(pub String);

impl FromStr for FriendStatus {
    type Err = UnknownFriendStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            other => Err(UnknownFriendStatus(other.to_owned())),
        }
    }
}

/// Answer to a pending friend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendAction {
    Accept,
    Reject,
}
