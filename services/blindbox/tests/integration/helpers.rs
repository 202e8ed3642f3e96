use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use blindbox::domain::repository::{
    BlogRepository, CommentRepository, ExpiryStore, FriendRepository, MailSender,
    MessageRepository, ProfileRepository, SessionBag, UserRepository,
};
use blindbox::domain::types::{
    Blog, BlogOrder, BlogQuery, BlogStats, BlogSummary, Comment, FriendEdge, Message, Profile,
    User,
};
use blindbox::error::BlindBoxError;
use blindbox::usecase::account::hash_password;
use blindbox_domain::friend::FriendStatus;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";
pub const TEST_PASSWORD: &str = "correct horse battery";

// ── MockDb ───────────────────────────────────────────────────────────────────

/// In-memory tables shared by every mock repository built from it.
#[derive(Clone, Default)]
pub struct MockDb {
    pub users: Arc<Mutex<Vec<User>>>,
    pub profiles: Arc<Mutex<Vec<Profile>>>,
    pub blogs: Arc<Mutex<Vec<Blog>>>,
    pub comments: Arc<Mutex<Vec<Comment>>>,
    pub friends: Arc<Mutex<Vec<FriendEdge>>>,
    pub messages: Arc<Mutex<Vec<Message>>>,
}

impl MockDb {
    pub fn with_users(users: Vec<User>) -> Self {
        let db = Self::default();
        *db.users.lock().unwrap() = users;
        db
    }

    pub fn user_repo(&self) -> MockUserRepo {
        MockUserRepo { db: self.clone() }
    }

    pub fn profile_repo(&self) -> MockProfileRepo {
        MockProfileRepo { db: self.clone() }
    }

    pub fn blog_repo(&self) -> MockBlogRepo {
        MockBlogRepo { db: self.clone() }
    }

    pub fn comment_repo(&self) -> MockCommentRepo {
        MockCommentRepo { db: self.clone() }
    }

    pub fn friend_repo(&self) -> MockFriendRepo {
        MockFriendRepo { db: self.clone() }
    }

    pub fn message_repo(&self) -> MockMessageRepo {
        MockMessageRepo { db: self.clone() }
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

pub struct MockUserRepo {
    db: MockDb,
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, BlindBoxError> {
        Ok(self.db.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, BlindBoxError> {
        Ok(self
            .db
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, BlindBoxError> {
        Ok(self
            .db
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<(), BlindBoxError> {
        self.db.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<User>, BlindBoxError> {
        let mut users = self.db.users.lock().unwrap().clone();
        users.sort_by_key(|u| u.date_joined);
        Ok(users)
    }

    async fn random_other(&self, exclude: Uuid) -> Result<Option<User>, BlindBoxError> {
        Ok(self
            .db
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id != exclude)
            .cloned())
    }
}

// ── MockProfileRepo ──────────────────────────────────────────────────────────

pub struct MockProfileRepo {
    db: MockDb,
}

impl ProfileRepository for MockProfileRepo {
    async fn find(&self, user_id: Uuid) -> Result<Option<Profile>, BlindBoxError> {
        Ok(self
            .db
            .profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn upsert(&self, profile: &Profile) -> Result<(), BlindBoxError> {
        let mut profiles = self.db.profiles.lock().unwrap();
        profiles.retain(|p| p.user_id != profile.user_id);
        profiles.push(profile.clone());
        Ok(())
    }
}

// ── MockBlogRepo ─────────────────────────────────────────────────────────────

pub struct MockBlogRepo {
    db: MockDb,
}

impl BlogRepository for MockBlogRepo {
    async fn create(&self, blog: &Blog) -> Result<(), BlindBoxError> {
        self.db.blogs.lock().unwrap().push(blog.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Blog>, BlindBoxError> {
        Ok(self.db.blogs.lock().unwrap().iter().find(|b| b.id == id).cloned())
    }

    async fn update(&self, blog: &Blog) -> Result<(), BlindBoxError> {
        let mut blogs = self.db.blogs.lock().unwrap();
        if let Some(existing) = blogs.iter_mut().find(|b| b.id == blog.id) {
            *existing = blog.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, BlindBoxError> {
        let mut blogs = self.db.blogs.lock().unwrap();
        let before = blogs.len();
        blogs.retain(|b| b.id != id);
        let removed = blogs.len() < before;
        if removed {
            self.db.comments.lock().unwrap().retain(|c| c.blog_id != id);
        }
        Ok(removed)
    }

    async fn search(
        &self,
        query: &BlogQuery,
        order: BlogOrder,
    ) -> Result<Vec<BlogSummary>, BlindBoxError> {
        let users = self.db.users.lock().unwrap().clone();
        let comments = self.db.comments.lock().unwrap().clone();
        let needle = query.search.as_ref().map(|s| s.to_lowercase());

        let mut rows: Vec<BlogSummary> = self
            .db
            .blogs
            .lock()
            .unwrap()
            .iter()
            .filter(|b| {
                query
                    .authors
                    .as_ref()
                    .is_none_or(|authors| authors.contains(&b.author_id))
            })
            .filter(|b| {
                needle.as_ref().is_none_or(|n| {
                    b.title.to_lowercase().contains(n) || b.content.to_lowercase().contains(n)
                })
            })
            .map(|b| BlogSummary {
                blog: b.clone(),
                author_username: users
                    .iter()
                    .find(|u| u.id == b.author_id)
                    .map(|u| u.username.clone())
                    .unwrap_or_default(),
                comment_count: comments.iter().filter(|c| c.blog_id == b.id).count() as u64,
            })
            .collect();

        rows.sort_by(|a, b| b.blog.created_at.cmp(&a.blog.created_at));
        if order == BlogOrder::MostCommented {
            rows.sort_by(|a, b| b.comment_count.cmp(&a.comment_count));
        }
        let limit = query.limit.map_or(usize::MAX, |l| l as usize);
        Ok(rows
            .into_iter()
            .skip(query.offset as usize)
            .take(limit)
            .collect())
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, BlindBoxError> {
        Ok(self
            .db
            .blogs
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.author_id == author_id)
            .count() as u64)
    }

    async fn stats_for_author(&self, author_id: Uuid) -> Result<BlogStats, BlindBoxError> {
        let blogs: Vec<Blog> = self
            .db
            .blogs
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.author_id == author_id)
            .cloned()
            .collect();
        let total_comments = self
            .db
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| blogs.iter().any(|b| b.id == c.blog_id))
            .count() as u64;
        Ok(BlogStats {
            total_blogs: blogs.len() as u64,
            total_comments,
            total_views: blogs.iter().map(|b| b.views as u64).sum(),
        })
    }
}

// ── MockCommentRepo ──────────────────────────────────────────────────────────

pub struct MockCommentRepo {
    db: MockDb,
}

impl CommentRepository for MockCommentRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, BlindBoxError> {
        Ok(self
            .db
            .comments
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn list_by_blog(&self, blog_id: Uuid) -> Result<Vec<Comment>, BlindBoxError> {
        Ok(self
            .db
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.blog_id == blog_id)
            .cloned()
            .collect())
    }

    async fn create(&self, comment: &Comment) -> Result<(), BlindBoxError> {
        self.db.comments.lock().unwrap().push(comment.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, BlindBoxError> {
        let mut comments = self.db.comments.lock().unwrap();
        if !comments.iter().any(|c| c.id == id) {
            return Ok(false);
        }
        // Cascade through every descendant, like the foreign key does.
        let mut doomed = vec![id];
        let mut i = 0;
        while i < doomed.len() {
            let parent = doomed[i];
            doomed.extend(
                comments
                    .iter()
                    .filter(|c| c.parent_id == Some(parent))
                    .map(|c| c.id),
            );
            i += 1;
        }
        comments.retain(|c| !doomed.contains(&c.id));
        Ok(true)
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, BlindBoxError> {
        Ok(self
            .db
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.author_id == author_id)
            .count() as u64)
    }
}

// ── MockFriendRepo ───────────────────────────────────────────────────────────

pub struct MockFriendRepo {
    db: MockDb,
}

impl FriendRepository for MockFriendRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<FriendEdge>, BlindBoxError> {
        Ok(self
            .db
            .friends
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn find_edge(&self, from: Uuid, to: Uuid) -> Result<Option<FriendEdge>, BlindBoxError> {
        Ok(self
            .db
            .friends
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.from_user_id == from && e.to_user_id == to)
            .cloned())
    }

    async fn create(&self, edge: &FriendEdge) -> Result<bool, BlindBoxError> {
        let mut edges = self.db.friends.lock().unwrap();
        if edges
            .iter()
            .any(|e| e.from_user_id == edge.from_user_id && e.to_user_id == edge.to_user_id)
        {
            return Ok(false);
        }
        edges.push(edge.clone());
        Ok(true)
    }

    async fn accept(&self, id: Uuid) -> Result<(), BlindBoxError> {
        let mut edges = self.db.friends.lock().unwrap();
        if let Some(edge) = edges.iter_mut().find(|e| e.id == id) {
            edge.status = FriendStatus::Accepted;
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, BlindBoxError> {
        let mut edges = self.db.friends.lock().unwrap();
        let before = edges.len();
        edges.retain(|e| e.id != id);
        Ok(edges.len() < before)
    }

    async fn are_friends(&self, a: Uuid, b: Uuid) -> Result<bool, BlindBoxError> {
        Ok(self.db.friends.lock().unwrap().iter().any(|e| {
            e.status == FriendStatus::Accepted
                && ((e.from_user_id == a && e.to_user_id == b)
                    || (e.from_user_id == b && e.to_user_id == a))
        }))
    }

    async fn list_pending_to(&self, user_id: Uuid) -> Result<Vec<FriendEdge>, BlindBoxError> {
        Ok(self
            .db
            .friends
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.to_user_id == user_id && e.status == FriendStatus::Pending)
            .cloned()
            .collect())
    }

    async fn list_accepted(&self, user_id: Uuid) -> Result<Vec<FriendEdge>, BlindBoxError> {
        Ok(self
            .db
            .friends
            .lock()
            .unwrap()
            .iter()
            .filter(|e| {
                e.status == FriendStatus::Accepted
                    && (e.from_user_id == user_id || e.to_user_id == user_id)
            })
            .cloned()
            .collect())
    }
}

// ── MockMessageRepo ──────────────────────────────────────────────────────────

pub struct MockMessageRepo {
    db: MockDb,
}

impl MessageRepository for MockMessageRepo {
    async fn create(&self, message: &Message) -> Result<(), BlindBoxError> {
        self.db.messages.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn count_sent(&self, sender: Uuid, receiver: Uuid) -> Result<u64, BlindBoxError> {
        Ok(self
            .db
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.sender_id == sender && m.receiver_id == receiver)
            .count() as u64)
    }

    async fn conversation(&self, a: Uuid, b: Uuid) -> Result<Vec<Message>, BlindBoxError> {
        Ok(self
            .db
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| {
                (m.sender_id == a && m.receiver_id == b) || (m.sender_id == b && m.receiver_id == a)
            })
            .cloned()
            .collect())
    }

    async fn mark_read(&self, sender: Uuid, receiver: Uuid) -> Result<u64, BlindBoxError> {
        let mut updated = 0;
        for m in self.db.messages.lock().unwrap().iter_mut() {
            if m.sender_id == sender && m.receiver_id == receiver && !m.is_read {
                m.is_read = true;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn counterparts(&self, user_id: Uuid) -> Result<Vec<Uuid>, BlindBoxError> {
        let mut seen = Vec::new();
        for m in self.db.messages.lock().unwrap().iter().rev() {
            let other = if m.sender_id == user_id {
                m.receiver_id
            } else if m.receiver_id == user_id {
                m.sender_id
            } else {
                continue;
            };
            if !seen.contains(&other) {
                seen.push(other);
            }
        }
        Ok(seen)
    }

    async fn unread_count(&self, receiver: Uuid) -> Result<u64, BlindBoxError> {
        Ok(self
            .db
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.receiver_id == receiver && !m.is_read)
            .count() as u64)
    }
}

// ── MemoryExpiryStore ────────────────────────────────────────────────────────

/// Expiry store on a manual clock. Entries are `(value, expires_at)` in clock seconds.
#[derive(Clone, Default)]
pub struct MemoryExpiryStore {
    pub entries: Arc<Mutex<HashMap<String, (String, u64)>>>,
    pub now: Arc<Mutex<u64>>,
}

impl MemoryExpiryStore {
    pub fn advance(&self, secs: u64) {
        *self.now.lock().unwrap() += secs;
    }

    /// Live value under `key`, ignoring expired entries.
    pub fn peek(&self, key: &str) -> Option<String> {
        let now = *self.now.lock().unwrap();
        self.entries
            .lock()
            .unwrap()
            .get(key)
            .filter(|(_, exp)| *exp > now)
            .map(|(v, _)| v.clone())
    }
}

impl ExpiryStore for MemoryExpiryStore {
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), BlindBoxError> {
        let now = *self.now.lock().unwrap();
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_owned(), (value.to_owned(), now + ttl_secs));
        Ok(())
    }

    async fn set_nx_ex(
        &self,
        key: &str,
        value: &str,
        ttl_secs: u64,
    ) -> Result<bool, BlindBoxError> {
        if self.peek(key).is_some() {
            return Ok(false);
        }
        self.set_ex(key, value, ttl_secs).await?;
        Ok(true)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, BlindBoxError> {
        Ok(self.peek(key))
    }

    async fn delete(&self, key: &str) -> Result<bool, BlindBoxError> {
        let live = self.peek(key).is_some();
        self.entries.lock().unwrap().remove(key);
        Ok(live)
    }
}

// ── MockSession ──────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockSession {
    pub values: Arc<Mutex<HashMap<String, String>>>,
    /// Fail every write, as an unreachable session store would.
    pub fail_writes: bool,
}

impl MockSession {
    pub fn broken() -> Self {
        Self {
            fail_writes: true,
            ..Default::default()
        }
    }
}

impl SessionBag for MockSession {
    async fn get(&self, key: &str) -> Result<Option<String>, BlindBoxError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn insert(&self, key: &str, value: &str) -> Result<(), BlindBoxError> {
        if self.fail_writes {
            return Err(BlindBoxError::Internal(anyhow::anyhow!("session store unavailable")));
        }
        self.values
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), BlindBoxError> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

// ── RecordingMailer ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SentMail {
    pub subject: String,
    pub body: String,
    pub to: Vec<String>,
}

#[derive(Clone, Default)]
pub struct RecordingMailer {
    pub sent: Arc<Mutex<Vec<SentMail>>>,
    pub fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

impl MailSender for RecordingMailer {
    async fn send(&self, subject: &str, body: &str, to: &[String]) -> Result<(), BlindBoxError> {
        if self.fail {
            return Err(BlindBoxError::MailFailed("connection refused".to_owned()));
        }
        self.sent.lock().unwrap().push(SentMail {
            subject: subject.to_owned(),
            body: body.to_owned(),
            to: to.to_vec(),
        });
        Ok(())
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub fn test_user(n: u128, username: &str) -> User {
    User {
        id: Uuid::from_u128(n),
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        password_hash: String::new(),
        role: 0,
        is_active: true,
        date_joined: Utc::now() - Duration::days(n as i64),
    }
}

/// A user whose password is [`TEST_PASSWORD`].
pub fn user_with_password(n: u128, username: &str) -> User {
    User {
        password_hash: hash_password(TEST_PASSWORD).unwrap(),
        ..test_user(n, username)
    }
}

pub fn test_blog(n: u128, author_id: Uuid, title: &str, created_at: DateTime<Utc>) -> Blog {
    Blog {
        id: Uuid::from_u128(1_000 + n),
        author_id,
        title: title.to_owned(),
        content: format!("{title} body"),
        image_url: None,
        views: 0,
        likes: 0,
        created_at,
        updated_at: created_at,
    }
}

pub fn test_comment(n: u128, blog_id: Uuid, author_id: Uuid, parent: Option<Uuid>) -> Comment {
    Comment {
        id: Uuid::from_u128(2_000 + n),
        blog_id,
        author_id,
        content: format!("comment {n}"),
        parent_id: parent,
        created_at: Utc::now(),
    }
}

pub fn accepted_edge(from: Uuid, to: Uuid) -> FriendEdge {
    FriendEdge {
        id: Uuid::now_v7(),
        from_user_id: from,
        to_user_id: to,
        status: FriendStatus::Accepted,
        created_at: Utc::now(),
    }
}
