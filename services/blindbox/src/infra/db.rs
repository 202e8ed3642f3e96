use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    FromQueryResult, JoinType, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use blindbox_core::sea_ext::{OrderByRandom, contains_ci, eq_ci};
use blindbox_domain::friend::FriendStatus;
use blindbox_schema::{blogs, comments, friends, messages, profiles, users};

use crate::domain::repository::{
    BlogRepository, CommentRepository, FriendRepository, MessageRepository, ProfileRepository,
    UserRepository,
};
use crate::domain::types::{
    Blog, BlogOrder, BlogQuery, BlogStats, BlogSummary, Comment, FriendEdge, Message, Profile,
    User,
};
use crate::error::BlindBoxError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, BlindBoxError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, BlindBoxError> {
        let model = users::Entity::find()
            .filter(eq_ci(users::Column::Email, email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, BlindBoxError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find user by username")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &User) -> Result<(), BlindBoxError> {
        users::ActiveModel {
            id: Set(user.id),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(user.role as i16),
            is_active: Set(user.is_active),
            date_joined: Set(user.date_joined),
        }
        .insert(&self.db)
        .await
        .context("create user")?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<User>, BlindBoxError> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::DateJoined)
            .all(&self.db)
            .await
            .context("list users")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn random_other(&self, exclude: Uuid) -> Result<Option<User>, BlindBoxError> {
        let model = users::Entity::find()
            .filter(users::Column::Id.ne(exclude))
            .order_by_random()
            .one(&self.db)
            .await
            .context("pick random user")?;
        Ok(model.map(user_from_model))
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        password_hash: model.password_hash,
        role: model.role as u8,
        is_active: model.is_active,
        date_joined: model.date_joined,
    }
}

// ── Profile repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProfileRepository {
    pub db: DatabaseConnection,
}

impl ProfileRepository for DbProfileRepository {
    async fn find(&self, user_id: Uuid) -> Result<Option<Profile>, BlindBoxError> {
        let model = profiles::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .context("find profile")?;
        Ok(model.map(profile_from_model))
    }

    async fn upsert(&self, profile: &Profile) -> Result<(), BlindBoxError> {
        let am = profiles::ActiveModel {
            user_id: Set(profile.user_id),
            nickname: Set(profile.nickname.clone()),
            avatar_url: Set(profile.avatar_url.clone()),
            age: Set(profile.age),
            gender: Set(profile.gender.map(|g| g.as_str().to_owned())),
            height_cm: Set(profile.height_cm),
            weight_kg: Set(profile.weight_kg),
            hobbies: Set(profile.hobbies.clone()),
        };
        profiles::Entity::insert(am)
            .on_conflict(
                OnConflict::column(profiles::Column::UserId)
                    .update_columns([
                        profiles::Column::Nickname,
                        profiles::Column::AvatarUrl,
                        profiles::Column::Age,
                        profiles::Column::Gender,
                        profiles::Column::HeightCm,
                        profiles::Column::WeightKg,
                        profiles::Column::Hobbies,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("upsert profile")?;
        Ok(())
    }
}

fn profile_from_model(model: profiles::Model) -> Profile {
    Profile {
        user_id: model.user_id,
        nickname: model.nickname,
        avatar_url: model.avatar_url,
        age: model.age,
        gender: model.gender.and_then(|g| g.parse().ok()),
        height_cm: model.height_cm,
        weight_kg: model.weight_kg,
        hobbies: model.hobbies,
    }
}

// ── Blog repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbBlogRepository {
    pub db: DatabaseConnection,
}

#[derive(FromQueryResult)]
struct BlogSummaryRow {
    id: Uuid,
    author_id: Uuid,
    title: String,
    content: String,
    image_url: Option<String>,
    views: i32,
    likes: i32,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    author_username: String,
    comment_count: i64,
}

impl BlogRepository for DbBlogRepository {
    async fn create(&self, blog: &Blog) -> Result<(), BlindBoxError> {
        blogs::ActiveModel {
            id: Set(blog.id),
            author_id: Set(blog.author_id),
            title: Set(blog.title.clone()),
            content: Set(blog.content.clone()),
            image_url: Set(blog.image_url.clone()),
            views: Set(blog.views),
            likes: Set(blog.likes),
            created_at: Set(blog.created_at),
            updated_at: Set(blog.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create blog")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Blog>, BlindBoxError> {
        let model = blogs::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find blog by id")?;
        Ok(model.map(blog_from_model))
    }

    async fn update(&self, blog: &Blog) -> Result<(), BlindBoxError> {
        blogs::ActiveModel {
            id: Set(blog.id),
            title: Set(blog.title.clone()),
            content: Set(blog.content.clone()),
            image_url: Set(blog.image_url.clone()),
            updated_at: Set(blog.updated_at),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update blog")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, BlindBoxError> {
        let result = blogs::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete blog")?;
        Ok(result.rows_affected > 0)
    }

    async fn search(
        &self,
        query: &BlogQuery,
        order: BlogOrder,
    ) -> Result<Vec<BlogSummary>, BlindBoxError> {
        if query.authors.as_ref().is_some_and(Vec::is_empty) {
            return Ok(Vec::new());
        }

        let comment_count = Expr::col((comments::Entity, comments::Column::Id)).count();
        let mut select = blogs::Entity::find()
            .select_only()
            .columns([
                blogs::Column::Id,
                blogs::Column::AuthorId,
                blogs::Column::Title,
                blogs::Column::Content,
                blogs::Column::ImageUrl,
                blogs::Column::Views,
                blogs::Column::Likes,
                blogs::Column::CreatedAt,
                blogs::Column::UpdatedAt,
            ])
            .column_as(users::Column::Username, "author_username")
            .column_as(comment_count.clone(), "comment_count")
            .join(JoinType::InnerJoin, blogs::Relation::Author.def())
            .join(JoinType::LeftJoin, blogs::Relation::Comments.def())
            .group_by(blogs::Column::Id)
            .group_by(users::Column::Username);

        if let Some(search) = &query.search {
            select = select.filter(
                Condition::any()
                    .add(contains_ci(blogs::Column::Title, search))
                    .add(contains_ci(blogs::Column::Content, search)),
            );
        }
        if let Some(authors) = &query.authors {
            select = select.filter(blogs::Column::AuthorId.is_in(authors.iter().copied()));
        }
        if order == BlogOrder::MostCommented {
            select = select.order_by(comment_count, Order::Desc);
        }

        let rows = select
            .order_by_desc(blogs::Column::CreatedAt)
            .limit(query.limit)
            .offset(query.offset)
            .into_model::<BlogSummaryRow>()
            .all(&self.db)
            .await
            .context("search blogs")?;
        Ok(rows.into_iter().map(summary_from_row).collect())
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, BlindBoxError> {
        let count = blogs::Entity::find()
            .filter(blogs::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .context("count blogs by author")?;
        Ok(count)
    }

    async fn stats_for_author(&self, author_id: Uuid) -> Result<BlogStats, BlindBoxError> {
        let total_blogs = self.count_by_author(author_id).await?;
        let total_views: Option<i64> = blogs::Entity::find()
            .select_only()
            .column_as(Expr::col(blogs::Column::Views).sum(), "total_views")
            .filter(blogs::Column::AuthorId.eq(author_id))
            .into_tuple::<Option<i64>>()
            .one(&self.db)
            .await
            .context("sum blog views")?
            .flatten();
        let total_comments = comments::Entity::find()
            .join(JoinType::InnerJoin, comments::Relation::Blog.def())
            .filter(blogs::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .context("count comments received")?;
        Ok(BlogStats {
            total_blogs,
            total_comments,
            total_views: total_views.unwrap_or(0).max(0) as u64,
        })
    }
}

fn blog_from_model(model: blogs::Model) -> Blog {
    Blog {
        id: model.id,
        author_id: model.author_id,
        title: model.title,
        content: model.content,
        image_url: model.image_url,
        views: model.views,
        likes: model.likes,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn summary_from_row(row: BlogSummaryRow) -> BlogSummary {
    BlogSummary {
        blog: Blog {
            id: row.id,
            author_id: row.author_id,
            title: row.title,
            content: row.content,
            image_url: row.image_url,
            views: row.views,
            likes: row.likes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        },
        author_username: row.author_username,
        comment_count: row.comment_count.max(0) as u64,
    }
}

// ── Comment repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCommentRepository {
    pub db: DatabaseConnection,
}

impl CommentRepository for DbCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, BlindBoxError> {
        let model = comments::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find comment by id")?;
        Ok(model.map(comment_from_model))
    }

    async fn list_by_blog(&self, blog_id: Uuid) -> Result<Vec<Comment>, BlindBoxError> {
        let models = comments::Entity::find()
            .filter(comments::Column::BlogId.eq(blog_id))
            .order_by_asc(comments::Column::CreatedAt)
            .order_by_asc(comments::Column::Id)
            .all(&self.db)
            .await
            .context("list comments by blog")?;
        Ok(models.into_iter().map(comment_from_model).collect())
    }

    async fn create(&self, comment: &Comment) -> Result<(), BlindBoxError> {
        comments::ActiveModel {
            id: Set(comment.id),
            blog_id: Set(comment.blog_id),
            author_id: Set(comment.author_id),
            content: Set(comment.content.clone()),
            parent_id: Set(comment.parent_id),
            created_at: Set(comment.created_at),
        }
        .insert(&self.db)
        .await
        .context("create comment")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, BlindBoxError> {
        let result = comments::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete comment")?;
        Ok(result.rows_affected > 0)
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, BlindBoxError> {
        let count = comments::Entity::find()
            .filter(comments::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .context("count comments by author")?;
        Ok(count)
    }
}

fn comment_from_model(model: comments::Model) -> Comment {
    Comment {
        id: model.id,
        blog_id: model.blog_id,
        author_id: model.author_id,
        content: model.content,
        parent_id: model.parent_id,
        created_at: model.created_at,
    }
}

// ── Friend repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbFriendRepository {
    pub db: DatabaseConnection,
}

impl FriendRepository for DbFriendRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<FriendEdge>, BlindBoxError> {
        let model = friends::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find friend edge by id")?;
        model.map(friend_from_model).transpose()
    }

    async fn find_edge(&self, from: Uuid, to: Uuid) -> Result<Option<FriendEdge>, BlindBoxError> {
        let model = friends::Entity::find()
            .filter(friends::Column::FromUserId.eq(from))
            .filter(friends::Column::ToUserId.eq(to))
            .one(&self.db)
            .await
            .context("find friend edge")?;
        model.map(friend_from_model).transpose()
    }

    async fn create(&self, edge: &FriendEdge) -> Result<bool, BlindBoxError> {
        let am = friends::ActiveModel {
            id: Set(edge.id),
            from_user_id: Set(edge.from_user_id),
            to_user_id: Set(edge.to_user_id),
            status: Set(edge.status.as_str().to_owned()),
            created_at: Set(edge.created_at),
        };
        let inserted = friends::Entity::insert(am)
            .on_conflict(
                OnConflict::columns([friends::Column::FromUserId, friends::Column::ToUserId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("create friend edge")?;
        Ok(inserted > 0)
    }

    async fn accept(&self, id: Uuid) -> Result<(), BlindBoxError> {
        friends::ActiveModel {
            id: Set(id),
            status: Set(FriendStatus::Accepted.as_str().to_owned()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("accept friend edge")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, BlindBoxError> {
        let result = friends::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete friend edge")?;
        Ok(result.rows_affected > 0)
    }

    async fn are_friends(&self, a: Uuid, b: Uuid) -> Result<bool, BlindBoxError> {
        let count = friends::Entity::find()
            .filter(friends::Column::Status.eq(FriendStatus::Accepted.as_str()))
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(friends::Column::FromUserId.eq(a))
                            .add(friends::Column::ToUserId.eq(b)),
                    )
                    .add(
                        Condition::all()
                            .add(friends::Column::FromUserId.eq(b))
                            .add(friends::Column::ToUserId.eq(a)),
                    ),
            )
            .count(&self.db)
            .await
            .context("check friendship")?;
        Ok(count > 0)
    }

    async fn list_pending_to(&self, user_id: Uuid) -> Result<Vec<FriendEdge>, BlindBoxError> {
        let models = friends::Entity::find()
            .filter(friends::Column::ToUserId.eq(user_id))
            .filter(friends::Column::Status.eq(FriendStatus::Pending.as_str()))
            .order_by_desc(friends::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list pending friend requests")?;
        models.into_iter().map(friend_from_model).collect()
    }

    async fn list_accepted(&self, user_id: Uuid) -> Result<Vec<FriendEdge>, BlindBoxError> {
        let models = friends::Entity::find()
            .filter(friends::Column::Status.eq(FriendStatus::Accepted.as_str()))
            .filter(
                Condition::any()
                    .add(friends::Column::FromUserId.eq(user_id))
                    .add(friends::Column::ToUserId.eq(user_id)),
            )
            .all(&self.db)
            .await
            .context("list accepted friends")?;
        models.into_iter().map(friend_from_model).collect()
    }
}

fn friend_from_model(model: friends::Model) -> Result<FriendEdge, BlindBoxError> {
    let status = model
        .status
        .parse::<FriendStatus>()
        .context("parse friend status")?;
    Ok(FriendEdge {
        id: model.id,
        from_user_id: model.from_user_id,
        to_user_id: model.to_user_id,
        status,
        created_at: model.created_at,
    })
}

// ── Message repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbMessageRepository {
    pub db: DatabaseConnection,
}

impl MessageRepository for DbMessageRepository {
    async fn create(&self, message: &Message) -> Result<(), BlindBoxError> {
        messages::ActiveModel {
            id: Set(message.id),
            sender_id: Set(message.sender_id),
            receiver_id: Set(message.receiver_id),
            content: Set(message.content.clone()),
            created_at: Set(message.created_at),
            is_read: Set(message.is_read),
        }
        .insert(&self.db)
        .await
        .context("create message")?;
        Ok(())
    }

    async fn count_sent(&self, sender: Uuid, receiver: Uuid) -> Result<u64, BlindBoxError> {
        let count = messages::Entity::find()
            .filter(messages::Column::SenderId.eq(sender))
            .filter(messages::Column::ReceiverId.eq(receiver))
            .count(&self.db)
            .await
            .context("count sent messages")?;
        Ok(count)
    }

    async fn conversation(&self, a: Uuid, b: Uuid) -> Result<Vec<Message>, BlindBoxError> {
        let models = messages::Entity::find()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(messages::Column::SenderId.eq(a))
                            .add(messages::Column::ReceiverId.eq(b)),
                    )
                    .add(
                        Condition::all()
                            .add(messages::Column::SenderId.eq(b))
                            .add(messages::Column::ReceiverId.eq(a)),
                    ),
            )
            .order_by_asc(messages::Column::CreatedAt)
            .order_by_asc(messages::Column::Id)
            .all(&self.db)
            .await
            .context("load conversation")?;
        Ok(models.into_iter().map(message_from_model).collect())
    }

    async fn mark_read(&self, sender: Uuid, receiver: Uuid) -> Result<u64, BlindBoxError> {
        let result = messages::Entity::update_many()
            .col_expr(messages::Column::IsRead, Expr::value(true))
            .filter(messages::Column::SenderId.eq(sender))
            .filter(messages::Column::ReceiverId.eq(receiver))
            .filter(messages::Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .context("mark messages read")?;
        Ok(result.rows_affected)
    }

    async fn counterparts(&self, user_id: Uuid) -> Result<Vec<Uuid>, BlindBoxError> {
        let pairs: Vec<(Uuid, Uuid)> = messages::Entity::find()
            .select_only()
            .columns([messages::Column::SenderId, messages::Column::ReceiverId])
            .filter(
                Condition::any()
                    .add(messages::Column::SenderId.eq(user_id))
                    .add(messages::Column::ReceiverId.eq(user_id)),
            )
            .order_by_desc(messages::Column::CreatedAt)
            .into_tuple()
            .all(&self.db)
            .await
            .context("list message counterparts")?;

        // Most recent conversation first, each partner once.
        let mut seen = Vec::new();
        for (sender, receiver) in pairs {
            let other = if sender == user_id { receiver } else { sender };
            if !seen.contains(&other) {
                seen.push(other);
            }
        }
        Ok(seen)
    }

    async fn unread_count(&self, receiver: Uuid) -> Result<u64, BlindBoxError> {
        let count = messages::Entity::find()
            .filter(messages::Column::ReceiverId.eq(receiver))
            .filter(messages::Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .context("count unread messages")?;
        Ok(count)
    }
}

fn message_from_model(model: messages::Model) -> Message {
    Message {
        id: model.id,
        sender_id: model.sender_id,
        receiver_id: model.receiver_id,
        content: model.content,
        created_at: model.created_at,
        is_read: model.is_read,
    }
}
