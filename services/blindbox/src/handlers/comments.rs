use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use blindbox_auth_types::identity::Identity;

use crate::error::BlindBoxError;
use crate::handlers::view::CommentResponse;
use crate::state::AppState;
use crate::usecase::comment::{AddCommentUseCase, DeleteCommentUseCase, ListCommentsUseCase};

// ── GET /blogs/{id}/comments ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListCommentsQuery {
    /// Return only comments without a parent, flat.
    #[serde(default)]
    pub top_level: bool,
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(blog_id): Path<Uuid>,
    Query(query): Query<ListCommentsQuery>,
) -> Result<Json<Vec<CommentResponse>>, BlindBoxError> {
    let usecase = ListCommentsUseCase {
        blogs: state.blog_repo(),
        comments: state.comment_repo(),
    };
    let comments = if query.top_level {
        usecase
            .top_level(blog_id)
            .await?
            .into_iter()
            .map(CommentResponse::from)
            .collect()
    } else {
        usecase
            .execute(blog_id)
            .await?
            .into_iter()
            .map(CommentResponse::from)
            .collect()
    };
    Ok(Json(comments))
}

// ── POST /blogs/{id}/comments ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AddCommentRequest {
    #[serde(default)]
    pub content: String,
    pub parent_id: Option<Uuid>,
}

pub async fn add_comment(
    State(state): State<AppState>,
    identity: Identity,
    Path(blog_id): Path<Uuid>,
    Json(body): Json<AddCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), BlindBoxError> {
    let usecase = AddCommentUseCase {
        blogs: state.blog_repo(),
        comments: state.comment_repo(),
    };
    let comment = usecase
        .execute(blog_id, identity.user_id, &body.content, body.parent_id)
        .await?;
    Ok((StatusCode::CREATED, Json(comment.into())))
}

// ── DELETE /comments/{id} ─────────────────────────────────────────────────────

pub async fn delete_comment(
    State(state): State<AppState>,
    identity: Identity,
    Path(comment_id): Path<Uuid>,
) -> Result<StatusCode, BlindBoxError> {
    let usecase = DeleteCommentUseCase {
        blogs: state.blog_repo(),
        comments: state.comment_repo(),
    };
    usecase
        .execute(comment_id, identity.user_id, identity.user_role)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
