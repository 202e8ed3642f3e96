#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::types::{
    Blog, BlogOrder, BlogQuery, BlogStats, BlogSummary, Comment, FriendEdge, Message, Profile,
    User,
};
use crate::error::BlindBoxError;

pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, BlindBoxError>;

    /// Case-insensitive exact match on email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, BlindBoxError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, BlindBoxError>;

    async fn create(&self, user: &User) -> Result<(), BlindBoxError>;

    /// All users, oldest first.
    async fn list_all(&self) -> Result<Vec<User>, BlindBoxError>;

    /// A uniformly random user other than `exclude`.
    async fn random_other(&self, exclude: Uuid) -> Result<Option<User>, BlindBoxError>;
}

pub trait ProfileRepository: Send + Sync {
    async fn find(&self, user_id: Uuid) -> Result<Option<Profile>, BlindBoxError>;

    /// Insert the row, or overwrite every column if it already exists.
    async fn upsert(&self, profile: &Profile) -> Result<(), BlindBoxError>;
}

pub trait BlogRepository: Send + Sync {
    async fn create(&self, blog: &Blog) -> Result<(), BlindBoxError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Blog>, BlindBoxError>;

    /// Persist title, content, image and `updated_at` of an existing blog.
    async fn update(&self, blog: &Blog) -> Result<(), BlindBoxError>;

    /// Delete a blog and, through the foreign key, its comments. Returns `false` if absent.
    async fn delete(&self, id: Uuid) -> Result<bool, BlindBoxError>;

    async fn search(
        &self,
        query: &BlogQuery,
        order: BlogOrder,
    ) -> Result<Vec<BlogSummary>, BlindBoxError>;

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, BlindBoxError>;

    /// Blog count, comments received and total views for an author.
    async fn stats_for_author(&self, author_id: Uuid) -> Result<BlogStats, BlindBoxError>;
}

pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, BlindBoxError>;

    /// Every comment on a blog, oldest first.
    async fn list_by_blog(&self, blog_id: Uuid) -> Result<Vec<Comment>, BlindBoxError>;

    async fn create(&self, comment: &Comment) -> Result<(), BlindBoxError>;

    /// Delete a comment and its replies. Returns `false` if absent.
    async fn delete(&self, id: Uuid) -> Result<bool, BlindBoxError>;

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, BlindBoxError>;
}

pub trait FriendRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<FriendEdge>, BlindBoxError>;

    /// The edge for the ordered pair `(from, to)`, any status.
    async fn find_edge(&self, from: Uuid, to: Uuid) -> Result<Option<FriendEdge>, BlindBoxError>;

    /// Insert a pending edge. Returns `false` if the ordered pair already has one.
    async fn create(&self, edge: &FriendEdge) -> Result<bool, BlindBoxError>;

    async fn accept(&self, id: Uuid) -> Result<(), BlindBoxError>;

    async fn delete(&self, id: Uuid) -> Result<bool, BlindBoxError>;

    /// `true` when an accepted edge exists in either direction.
    async fn are_friends(&self, a: Uuid, b: Uuid) -> Result<bool, BlindBoxError>;

    /// Pending edges addressed to `user_id`, newest first.
    async fn list_pending_to(&self, user_id: Uuid) -> Result<Vec<FriendEdge>, BlindBoxError>;

    /// Accepted edges touching `user_id`.
    async fn list_accepted(&self, user_id: Uuid) -> Result<Vec<FriendEdge>, BlindBoxError>;
}

pub trait MessageRepository: Send + Sync {
    async fn create(&self, message: &Message) -> Result<(), BlindBoxError>;

    async fn count_sent(&self, sender: Uuid, receiver: Uuid) -> Result<u64, BlindBoxError>;

    /// Messages between `a` and `b` in both directions, oldest first.
    async fn conversation(&self, a: Uuid, b: Uuid) -> Result<Vec<Message>, BlindBoxError>;

    /// Mark unread messages from `sender` to `receiver` as read. Returns rows changed.
    async fn mark_read(&self, sender: Uuid, receiver: Uuid) -> Result<u64, BlindBoxError>;

    /// Users `user_id` has sent to or received from.
    async fn counterparts(&self, user_id: Uuid) -> Result<Vec<Uuid>, BlindBoxError>;

    async fn unread_count(&self, receiver: Uuid) -> Result<u64, BlindBoxError>;
}

/// Short-lived string values with per-key TTL.
pub trait ExpiryStore: Send + Sync {
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), BlindBoxError>;

    /// Set only if the key is absent. Returns `true` when this call created it.
    async fn set_nx_ex(&self, key: &str, value: &str, ttl_secs: u64)
    -> Result<bool, BlindBoxError>;

    async fn get(&self, key: &str) -> Result<Option<String>, BlindBoxError>;

    /// Returns `true` when this call removed a live key.
    async fn delete(&self, key: &str) -> Result<bool, BlindBoxError>;
}

/// Per-browser key-value state keyed by the session cookie.
pub trait SessionBag: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, BlindBoxError>;

    async fn insert(&self, key: &str, value: &str) -> Result<(), BlindBoxError>;

    async fn remove(&self, key: &str) -> Result<(), BlindBoxError>;
}

/// Outgoing plain-text mail.
pub trait MailSender: Send + Sync {
    async fn send(&self, subject: &str, body: &str, to: &[String]) -> Result<(), BlindBoxError>;
}

impl<T: MailSender> MailSender for std::sync::Arc<T> {
    async fn send(&self, subject: &str, body: &str, to: &[String]) -> Result<(), BlindBoxError> {
        (**self).send(subject, body, to).await
    }
}
