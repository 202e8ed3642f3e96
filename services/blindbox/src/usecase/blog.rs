use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use blindbox_domain::blog::{BLOG_TITLE_MAX_LEN, FeedFilter};
use blindbox_domain::pagination::PageRequest;
use blindbox_domain::user::UserRole;

use crate::domain::repository::{
    BlogRepository, CommentRepository, FriendRepository, MessageRepository, UserRepository,
};
use crate::domain::types::{
    Blog, BlogOrder, BlogQuery, BlogStats, BlogSummary, CommentNode, User,
};
use crate::error::{BlindBoxError, FieldError};
use crate::usecase::comment::build_thread;
use crate::usecase::friend::friend_ids;

pub struct BlogInput {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
}

impl BlogInput {
    /// Trimmed, validated copy of the input.
    fn cleaned(self) -> Result<Self, BlindBoxError> {
        let title = self.title.trim().to_owned();
        let content = self.content.trim().to_owned();
        let mut errors = Vec::new();
        if title.is_empty() {
            errors.push(FieldError::new("title", "This field is required."));
        } else if title.chars().count() > BLOG_TITLE_MAX_LEN {
            errors.push(FieldError::new(
                "title",
                "Ensure this value has at most 200 characters.",
            ));
        }
        if content.is_empty() {
            errors.push(FieldError::new("content", "This field is required."));
        }
        if !errors.is_empty() {
            return Err(BlindBoxError::Validation(errors));
        }
        Ok(Self {
            title,
            content,
            image_url: self
                .image_url
                .map(|u| u.trim().to_owned())
                .filter(|u| !u.is_empty()),
        })
    }
}

fn is_staff(role: u8) -> bool {
    UserRole::from_u8(role).is_some_and(UserRole::is_staff)
}

// ── CreateBlog ───────────────────────────────────────────────────────────────

pub struct CreateBlogUseCase<B: BlogRepository> {
    pub blogs: B,
}

impl<B: BlogRepository> CreateBlogUseCase<B> {
    pub async fn execute(&self, author_id: Uuid, input: BlogInput) -> Result<Blog, BlindBoxError> {
        let input = input.cleaned()?;
        let now = Utc::now();
        let blog = Blog {
            id: Uuid::now_v7(),
            author_id,
            title: input.title,
            content: input.content,
            image_url: input.image_url,
            views: 0,
            likes: 0,
            created_at: now,
            updated_at: now,
        };
        self.blogs.create(&blog).await?;
        info!(blog_id = %blog.id, author_id = %author_id, "blog created");
        Ok(blog)
    }
}

// ── GetBlog ──────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct BlogDetail {
    pub blog: Blog,
    pub author: User,
    pub comments: Vec<CommentNode>,
}

pub struct GetBlogUseCase<B, C, U>
where
    B: BlogRepository,
    C: CommentRepository,
    U: UserRepository,
{
    pub blogs: B,
    pub comments: C,
    pub users: U,
}

impl<B, C, U> GetBlogUseCase<B, C, U>
where
    B: BlogRepository,
    C: CommentRepository,
    U: UserRepository,
{
    pub async fn execute(&self, blog_id: Uuid) -> Result<BlogDetail, BlindBoxError> {
        let blog = self
            .blogs
            .find_by_id(blog_id)
            .await?
            .ok_or(BlindBoxError::BlogNotFound)?;
        let author = self
            .users
            .find_by_id(blog.author_id)
            .await?
            .ok_or(BlindBoxError::BlogNotFound)?;
        let comments = build_thread(self.comments.list_by_blog(blog.id).await?);
        Ok(BlogDetail {
            blog,
            author,
            comments,
        })
    }
}

// ── EditBlog ─────────────────────────────────────────────────────────────────

pub struct EditBlogUseCase<B: BlogRepository> {
    pub blogs: B,
}

impl<B: BlogRepository> EditBlogUseCase<B> {
    /// Only the author may edit.
    pub async fn execute(
        &self,
        blog_id: Uuid,
        editor: Uuid,
        input: BlogInput,
    ) -> Result<Blog, BlindBoxError> {
        let mut blog = self
            .blogs
            .find_by_id(blog_id)
            .await?
            .ok_or(BlindBoxError::BlogNotFound)?;
        if blog.author_id != editor {
            return Err(BlindBoxError::Forbidden);
        }
        let input = input.cleaned()?;
        blog.title = input.title;
        blog.content = input.content;
        blog.image_url = input.image_url;
        blog.updated_at = Utc::now();
        self.blogs.update(&blog).await?;
        Ok(blog)
    }
}

// ── DeleteBlog ───────────────────────────────────────────────────────────────

pub struct DeleteBlogUseCase<B: BlogRepository> {
    pub blogs: B,
}

impl<B: BlogRepository> DeleteBlogUseCase<B> {
    /// The author or staff may delete.
    pub async fn execute(&self, blog_id: Uuid, actor: Uuid, actor_role: u8) -> Result<(), BlindBoxError> {
        let blog = self
            .blogs
            .find_by_id(blog_id)
            .await?
            .ok_or(BlindBoxError::BlogNotFound)?;
        if blog.author_id != actor && !is_staff(actor_role) {
            return Err(BlindBoxError::Forbidden);
        }
        if !self.blogs.delete(blog.id).await? {
            return Err(BlindBoxError::BlogNotFound);
        }
        info!(blog_id = %blog.id, actor = %actor, "blog deleted");
        Ok(())
    }
}

// ── Feed ─────────────────────────────────────────────────────────────────────

pub struct FeedInput {
    pub viewer: Option<Uuid>,
    pub search: Option<String>,
    pub filter: FeedFilter,
    pub page: PageRequest,
}

#[derive(Debug)]
pub struct FeedOutput {
    pub blogs: Vec<BlogSummary>,
    /// Present for signed-in viewers only.
    pub unread_messages: Option<u64>,
    pub pending_friend_requests: Option<u64>,
}

pub struct FeedUseCase<B, F, M>
where
    B: BlogRepository,
    F: FriendRepository,
    M: MessageRepository,
{
    pub blogs: B,
    pub friends: F,
    pub messages: M,
}

impl<B, F, M> FeedUseCase<B, F, M>
where
    B: BlogRepository,
    F: FriendRepository,
    M: MessageRepository,
{
    pub async fn execute(&self, input: FeedInput) -> Result<FeedOutput, BlindBoxError> {
        let authors = match (input.filter, input.viewer) {
            (FeedFilter::Following, Some(viewer)) => Some(friend_ids(&self.friends, viewer).await?),
            (FeedFilter::Following, None) => Some(Vec::new()),
            _ => None,
        };
        let order = match input.filter {
            FeedFilter::Popular => BlogOrder::MostCommented,
            FeedFilter::Latest | FeedFilter::Following => BlogOrder::Newest,
        };
        let query = BlogQuery {
            search: normalize_search(input.search),
            authors,
            limit: Some(input.page.limit()),
            offset: input.page.offset(),
        };
        let blogs = self.blogs.search(&query, order).await?;

        let (unread_messages, pending_friend_requests) = match input.viewer {
            Some(viewer) => (
                Some(self.messages.unread_count(viewer).await?),
                Some(self.friends.list_pending_to(viewer).await?.len() as u64),
            ),
            None => (None, None),
        };

        Ok(FeedOutput {
            blogs,
            unread_messages,
            pending_friend_requests,
        })
    }
}

fn normalize_search(search: Option<String>) -> Option<String> {
    search
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

// ── MyBlogs ──────────────────────────────────────────────────────────────────

pub struct MyBlogsUseCase<B: BlogRepository> {
    pub blogs: B,
}

impl<B: BlogRepository> MyBlogsUseCase<B> {
    pub async fn execute(&self, author_id: Uuid) -> Result<(Vec<BlogSummary>, BlogStats), BlindBoxError> {
        let query = BlogQuery {
            authors: Some(vec![author_id]),
            ..Default::default()
        };
        let blogs = self.blogs.search(&query, BlogOrder::Newest).await?;
        let stats = self.blogs.stats_for_author(author_id).await?;
        Ok((blogs, stats))
    }
}

// ── UserBlogs ────────────────────────────────────────────────────────────────

pub struct UserBlogsUseCase<U: UserRepository, B: BlogRepository> {
    pub users: U,
    pub blogs: B,
}

impl<U: UserRepository, B: BlogRepository> UserBlogsUseCase<U, B> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        search: Option<String>,
    ) -> Result<(User, Vec<BlogSummary>), BlindBoxError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(BlindBoxError::UserNotFound)?;
        let query = BlogQuery {
            search: normalize_search(search),
            authors: Some(vec![user.id]),
            ..Default::default()
        };
        let blogs = self.blogs.search(&query, BlogOrder::Newest).await?;
        Ok((user, blogs))
    }
}
