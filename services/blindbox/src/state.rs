use std::sync::Arc;

use axum::extract::FromRef;
use deadpool_redis::Pool as RedisPool;
use sea_orm::DatabaseConnection;

use blindbox_auth_types::identity::JwtSecret;
use blindbox_auth_types::session::SessionId;

use crate::infra::cache::{RedisExpiryStore, RedisSession};
use crate::infra::db::{
    DbBlogRepository, DbCommentRepository, DbFriendRepository, DbMessageRepository,
    DbProfileRepository, DbUserRepository,
};
use crate::infra::mail::SmtpMailer;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: RedisPool,
    pub mailer: Arc<SmtpMailer>,
    pub jwt_secret: String,
    pub cookie_domain: String,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn profile_repo(&self) -> DbProfileRepository {
        DbProfileRepository {
            db: self.db.clone(),
        }
    }

    pub fn blog_repo(&self) -> DbBlogRepository {
        DbBlogRepository {
            db: self.db.clone(),
        }
    }

    pub fn comment_repo(&self) -> DbCommentRepository {
        DbCommentRepository {
            db: self.db.clone(),
        }
    }

    pub fn friend_repo(&self) -> DbFriendRepository {
        DbFriendRepository {
            db: self.db.clone(),
        }
    }

    pub fn message_repo(&self) -> DbMessageRepository {
        DbMessageRepository {
            db: self.db.clone(),
        }
    }

    pub fn expiry_store(&self) -> RedisExpiryStore {
        RedisExpiryStore {
            pool: self.redis.clone(),
        }
    }

    pub fn session(&self, session_id: &SessionId) -> RedisSession {
        RedisSession {
            pool: self.redis.clone(),
            session_id: session_id.0.clone(),
        }
    }
}

impl FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for JwtSecret {
    fn from_ref(state: &AppState) -> Self {
        JwtSecret(state.jwt_secret.clone())
    }
}
