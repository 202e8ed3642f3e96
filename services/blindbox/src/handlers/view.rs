//! JSON shapes shared by several handlers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use blindbox_core::serde::to_rfc3339_ms;

use crate::domain::types::{Blog, BlogSummary, Comment, CommentNode, Message, ProfileCard, User};

#[derive(Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct ProfileCardResponse {
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

impl From<ProfileCard> for ProfileCardResponse {
    fn from(card: ProfileCard) -> Self {
        Self {
            user_id: card.user_id,
            username: card.username,
            nickname: card.nickname,
            avatar_url: card.avatar_url,
            age: card.age,
            gender: card.gender,
            height: card.height,
            weight: card.weight,
            hobbies: card.hobbies,
        }
    }
}

#[derive(Serialize)]
pub struct BlogResponse {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub views: i32,
    pub likes: i32,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Blog> for BlogResponse {
    fn from(blog: Blog) -> Self {
        Self {
            id: blog.id,
            author_id: blog.author_id,
            title: blog.title,
            content: blog.content,
            image_url: blog.image_url,
            views: blog.views,
            likes: blog.likes,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
        }
    }
}

/// Blog row in a listing, with its author and comment count.
#[derive(Serialize)]
pub struct BlogListItem {
    #[serde(flatten)]
    pub blog: BlogResponse,
    pub author_username: String,
    pub comment_count: u64,
}

impl From<BlogSummary> for BlogListItem {
    fn from(summary: BlogSummary) -> Self {
        Self {
            blog: summary.blog.into(),
            author_username: summary.author_username,
            comment_count: summary.comment_count,
        }
    }
}

pub fn blog_list(summaries: Vec<BlogSummary>) -> Vec<BlogListItem> {
    summaries.into_iter().map(BlogListItem::from).collect()
}

#[derive(Serialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub blog_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub parent_id: Option<Uuid>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replies: Option<Vec<CommentResponse>>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            blog_id: comment.blog_id,
            author_id: comment.author_id,
            content: comment.content,
            parent_id: comment.parent_id,
            created_at: comment.created_at,
            replies: None,
        }
    }
}

impl From<CommentNode> for CommentResponse {
    fn from(node: CommentNode) -> Self {
        Self {
            replies: Some(node.replies.into_iter().map(Self::from).collect()),
            ..Self::from(node.comment)
        }
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            content: message.content,
            created_at: message.created_at,
            is_read: message.is_read,
        }
    }
}
