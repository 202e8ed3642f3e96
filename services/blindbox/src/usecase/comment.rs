use std::collections::{HashMap, HashSet};

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use blindbox_domain::user::UserRole;

use crate::domain::repository::{BlogRepository, CommentRepository};
use crate::domain::types::{Comment, CommentNode};
use crate::error::BlindBoxError;

/// Arrange a blog's comments into a forest. Siblings keep input order. A comment whose
/// parent is not in `comments` is treated as top-level.
pub fn build_thread(comments: Vec<Comment>) -> Vec<CommentNode> {
    let ids: HashSet<Uuid> = comments.iter().map(|c| c.id).collect();
    let mut children: HashMap<Option<Uuid>, Vec<usize>> = HashMap::new();
    for (idx, comment) in comments.iter().enumerate() {
        let parent = comment.parent_id.filter(|p| ids.contains(p));
        children.entry(parent).or_default().push(idx);
    }

    fn build(
        parent: Option<Uuid>,
        comments: &[Comment],
        children: &HashMap<Option<Uuid>, Vec<usize>>,
    ) -> Vec<CommentNode> {
        children
            .get(&parent)
            .map(|indexes| {
                indexes
                    .iter()
                    .map(|&idx| CommentNode {
                        comment: comments[idx].clone(),
                        replies: build(Some(comments[idx].id), comments, children),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    build(None, &comments, &children)
}

/// Comments without a parent, oldest first.
pub fn top_level(comments: &[Comment]) -> Vec<&Comment> {
    comments.iter().filter(|c| c.parent_id.is_none()).collect()
}

// ── ListComments ─────────────────────────────────────────────────────────────

pub struct ListCommentsUseCase<B: BlogRepository, C: CommentRepository> {
    pub blogs: B,
    pub comments: C,
}

impl<B: BlogRepository, C: CommentRepository> ListCommentsUseCase<B, C> {
    pub async fn execute(&self, blog_id: Uuid) -> Result<Vec<CommentNode>, BlindBoxError> {
        if self.blogs.find_by_id(blog_id).await?.is_none() {
            return Err(BlindBoxError::BlogNotFound);
        }
        Ok(build_thread(self.comments.list_by_blog(blog_id).await?))
    }

    /// Only the comments that are not replies, oldest first.
    pub async fn top_level(&self, blog_id: Uuid) -> Result<Vec<Comment>, BlindBoxError> {
        if self.blogs.find_by_id(blog_id).await?.is_none() {
            return Err(BlindBoxError::BlogNotFound);
        }
        let comments = self.comments.list_by_blog(blog_id).await?;
        Ok(top_level(&comments).into_iter().cloned().collect())
    }
}

// ── AddComment ───────────────────────────────────────────────────────────────

pub struct AddCommentUseCase<B: BlogRepository, C: CommentRepository> {
    pub blogs: B,
    pub comments: C,
}

impl<B: BlogRepository, C: CommentRepository> AddCommentUseCase<B, C> {
    pub async fn execute(
        &self,
        blog_id: Uuid,
        author_id: Uuid,
        content: &str,
        parent_id: Option<Uuid>,
    ) -> Result<Comment, BlindBoxError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(BlindBoxError::field("content", "This field is required."));
        }
        if self.blogs.find_by_id(blog_id).await?.is_none() {
            return Err(BlindBoxError::BlogNotFound);
        }

        // An unresolvable parent, or one on another blog, demotes the reply to top-level.
        let parent_id = match parent_id {
            Some(pid) => {
                let parent = self
                    .comments
                    .find_by_id(pid)
                    .await?
                    .filter(|p| p.blog_id == blog_id);
                if parent.is_none() {
                    debug!(parent_id = %pid, blog_id = %blog_id, "dropping unknown comment parent");
                }
                parent.map(|p| p.id)
            }
            None => None,
        };

        let comment = Comment {
            id: Uuid::now_v7(),
            blog_id,
            author_id,
            content: content.to_owned(),
            parent_id,
            created_at: Utc::now(),
        };
        self.comments.create(&comment).await?;
        Ok(comment)
    }
}

// ── DeleteComment ────────────────────────────────────────────────────────────

pub struct DeleteCommentUseCase<B: BlogRepository, C: CommentRepository> {
    pub blogs: B,
    pub comments: C,
}

impl<B: BlogRepository, C: CommentRepository> DeleteCommentUseCase<B, C> {
    /// Allowed for the comment author, the blog author and staff. Anyone else gets the
    /// same not-found error as for a missing comment. Returns the blog id.
    pub async fn execute(
        &self,
        comment_id: Uuid,
        actor: Uuid,
        actor_role: u8,
    ) -> Result<Uuid, BlindBoxError> {
        let comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or(BlindBoxError::CommentNotFound)?;
        let blog_author = self
            .blogs
            .find_by_id(comment.blog_id)
            .await?
            .map(|b| b.author_id);

        let allowed = comment.author_id == actor
            || blog_author == Some(actor)
            || UserRole::from_u8(actor_role).is_some_and(UserRole::is_staff);
        if !allowed {
            debug!(comment_id = %comment_id, actor = %actor, "comment delete not permitted");
            return Err(BlindBoxError::CommentNotFound);
        }

        self.comments.delete(comment.id).await?;
        info!(comment_id = %comment.id, actor = %actor, "comment deleted");
        Ok(comment.blog_id)
    }
}
