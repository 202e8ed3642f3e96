use chrono::{DateTime, Utc};
use uuid::Uuid;

use blindbox_domain::friend::FriendStatus;
use blindbox_domain::profile::{Gender, NOT_PROVIDED};

/// Login code length in digits.
pub const LOGIN_CODE_LEN: usize = 6;

/// Login code time-to-live in seconds.
pub const LOGIN_CODE_TTL_SECS: u64 = 300;

/// Minimum interval between two code requests for the same email.
pub const LOGIN_CODE_COOLDOWN_SECS: u64 = 60;

/// Longest code input accepted before comparison.
pub const LOGIN_CODE_INPUT_MAX_LEN: usize = 10;

/// Messages a non-friend may send before the receiver replies.
pub const MESSAGE_LIMIT: u64 = 2;

/// Blogs shown on a profile page.
pub const PROFILE_RECENT_BLOGS: u64 = 5;

/// Session key holding the email a login code was sent to.
pub const SESSION_EMAIL_FOR_LOGIN: &str = "email_for_login";

/// Session key holding the UI theme.
pub const SESSION_THEME: &str = "theme";

pub fn login_code_key(email: &str) -> String {
    format!("login_code_{email}")
}

pub fn login_code_cooldown_key(email: &str) -> String {
    format!("login_code_cooldown_{email}")
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub role: u8,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub user_id: Uuid,
    pub nickname: Option<String>,
    pub avatar_url: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub height_cm: Option<i32>,
    pub weight_kg: Option<f64>,
    pub hobbies: Option<String>,
}

/// Profile as shown to other users, with missing fields filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileCard {
    pub user_id: Uuid,
    pub username: String,
    pub nickname: String,
    pub avatar_url: Option<String>,
    pub age: String,
    pub gender: String,
    pub height: String,
    pub weight: String,
    pub hobbies: String,
}

impl ProfileCard {
    /// Build a card from a user and an optional profile row. The nickname falls back to
    /// the username; other absent fields read "not provided".
    pub fn render(user: &User, profile: Option<&Profile>) -> Self {
        let filled = |s: Option<&String>| {
            s.filter(|v| !v.trim().is_empty())
                .cloned()
                .unwrap_or_else(|| NOT_PROVIDED.to_owned())
        };
        let nickname = profile
            .and_then(|p| p.nickname.as_ref())
            .filter(|n| !n.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| user.username.clone());
        Self {
            user_id: user.id,
            username: user.username.clone(),
            nickname,
            avatar_url: profile.and_then(|p| p.avatar_url.clone()),
            age: profile
                .and_then(|p| p.age)
                .map_or_else(|| NOT_PROVIDED.to_owned(), |a| a.to_string()),
            gender: profile
                .and_then(|p| p.gender)
                .map_or_else(|| NOT_PROVIDED.to_owned(), |g| g.label().to_owned()),
            height: profile
                .and_then(|p| p.height_cm)
                .map_or_else(|| NOT_PROVIDED.to_owned(), |h| format!("{h}cm")),
            weight: profile
                .and_then(|p| p.weight_kg)
                .map_or_else(|| NOT_PROVIDED.to_owned(), |w| format!("{w}kg")),
            hobbies: filled(profile.and_then(|p| p.hobbies.as_ref())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Blog {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub views: i32,
    pub likes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Blog listed in a feed together with its author's name and comment count.
#[derive(Debug, Clone)]
pub struct BlogSummary {
    pub blog: Blog,
    pub author_username: String,
    pub comment_count: u64,
}

/// Row ordering for blog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlogOrder {
    Newest,
    MostCommented,
}

/// Filter passed to blog listings.
#[derive(Debug, Clone, Default)]
pub struct BlogQuery {
    /// Case-insensitive substring matched against title or content.
    pub search: Option<String>,
    /// Restrict to these authors. `Some(vec![])` matches nothing.
    pub authors: Option<Vec<Uuid>>,
    pub limit: Option<u64>,
    pub offset: u64,
}

/// Totals for an author's own blogs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlogStats {
    pub total_blogs: u64,
    pub total_comments: u64,
    pub total_views: u64,
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub id: Uuid,
    pub blog_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// A comment and its replies, recursively.
#[derive(Debug, Clone)]
pub struct CommentNode {
    pub comment: Comment,
    pub replies: Vec<CommentNode>,
}

#[derive(Debug, Clone)]
pub struct FriendEdge {
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub status: FriendStatus,
    pub created_at: DateTime<Utc>,
}

impl FriendEdge {
    /// The user on the other side of this edge from `user_id`.
    pub fn counterpart(&self, user_id: Uuid) -> Uuid {
        if self.from_user_id == user_id {
            self.to_user_id
        } else {
            self.from_user_id
        }
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}
