use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use blindbox_auth_types::identity::Identity;
use blindbox_domain::blog::FeedFilter;
use blindbox_domain::pagination::PageRequest;

use crate::error::BlindBoxError;
use crate::handlers::view::{BlogListItem, BlogResponse, CommentResponse, UserSummary, blog_list};
use crate::state::AppState;
use crate::usecase::blog::{
    BlogInput, CreateBlogUseCase, DeleteBlogUseCase, EditBlogUseCase, FeedInput, FeedUseCase,
    GetBlogUseCase, MyBlogsUseCase,
};

// ── GET /blogs ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct FeedQuery {
    pub q: Option<String>,
    #[serde(default)]
    pub filter: FeedFilter,
    #[serde(rename = "per-page")]
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

impl FeedQuery {
    fn page_request(&self) -> PageRequest {
        PageRequest::from_query(self.per_page, self.page)
    }
}

#[derive(Serialize)]
pub struct FeedResponse {
    pub blogs: Vec<BlogListItem>,
    pub filter: FeedFilter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread_messages: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_friend_requests: Option<u64>,
}

pub async fn feed(
    State(state): State<AppState>,
    identity: Option<Identity>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<FeedResponse>, BlindBoxError> {
    let usecase = FeedUseCase {
        blogs: state.blog_repo(),
        friends: state.friend_repo(),
        messages: state.message_repo(),
    };
    let page = query.page_request();
    let out = usecase
        .execute(FeedInput {
            viewer: identity.map(|i| i.user_id),
            search: query.q,
            filter: query.filter,
            page,
        })
        .await?;
    Ok(Json(FeedResponse {
        blogs: blog_list(out.blogs),
        filter: query.filter,
        unread_messages: out.unread_messages,
        pending_friend_requests: out.pending_friend_requests,
    }))
}

// ── POST /blogs ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct BlogRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub image_url: Option<String>,
}

impl From<BlogRequest> for BlogInput {
    fn from(body: BlogRequest) -> Self {
        Self {
            title: body.title,
            content: body.content,
            image_url: body.image_url,
        }
    }
}

pub async fn create_blog(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<BlogRequest>,
) -> Result<(StatusCode, Json<BlogResponse>), BlindBoxError> {
    let usecase = CreateBlogUseCase {
        blogs: state.blog_repo(),
    };
    let blog = usecase.execute(identity.user_id, body.into()).await?;
    Ok((StatusCode::CREATED, Json(blog.into())))
}

// ── GET /blogs/mine ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct MyBlogsResponse {
    pub blogs: Vec<BlogListItem>,
    pub total_blogs: u64,
    pub total_comments: u64,
    pub total_views: u64,
}

pub async fn my_blogs(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<MyBlogsResponse>, BlindBoxError> {
    let usecase = MyBlogsUseCase {
        blogs: state.blog_repo(),
    };
    let (blogs, stats) = usecase.execute(identity.user_id).await?;
    Ok(Json(MyBlogsResponse {
        blogs: blog_list(blogs),
        total_blogs: stats.total_blogs,
        total_comments: stats.total_comments,
        total_views: stats.total_views,
    }))
}

// ── GET /blogs/{id} ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct BlogDetailResponse {
    #[serde(flatten)]
    pub blog: BlogResponse,
    pub author: UserSummary,
    pub comments: Vec<CommentResponse>,
}

pub async fn get_blog(
    State(state): State<AppState>,
    Path(blog_id): Path<Uuid>,
) -> Result<Json<BlogDetailResponse>, BlindBoxError> {
    let usecase = GetBlogUseCase {
        blogs: state.blog_repo(),
        comments: state.comment_repo(),
        users: state.user_repo(),
    };
    let detail = usecase.execute(blog_id).await?;
    Ok(Json(BlogDetailResponse {
        author: UserSummary::from(&detail.author),
        blog: detail.blog.into(),
        comments: detail.comments.into_iter().map(CommentResponse::from).collect(),
    }))
}

// ── PATCH /blogs/{id} ─────────────────────────────────────────────────────────

pub async fn edit_blog(
    State(state): State<AppState>,
    identity: Identity,
    Path(blog_id): Path<Uuid>,
    Json(body): Json<BlogRequest>,
) -> Result<Json<BlogResponse>, BlindBoxError> {
    let usecase = EditBlogUseCase {
        blogs: state.blog_repo(),
    };
    let blog = usecase
        .execute(blog_id, identity.user_id, body.into())
        .await?;
    Ok(Json(blog.into()))
}

// ── DELETE /blogs/{id} ────────────────────────────────────────────────────────

pub async fn delete_blog(
    State(state): State<AppState>,
    identity: Identity,
    Path(blog_id): Path<Uuid>,
) -> Result<StatusCode, BlindBoxError> {
    let usecase = DeleteBlogUseCase {
        blogs: state.blog_repo(),
    };
    usecase
        .execute(blog_id, identity.user_id, identity.user_role)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
