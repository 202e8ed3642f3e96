use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Service error variants.
#[derive(Debug, thiserror::Error)]
pub enum BlindBoxError {
    #[error("no account is registered with this email")]
    UnknownEmail,
    #[error("a code was sent recently, wait a minute before requesting another")]
    CoolingDown,
    #[error("failed to send login code")]
    MailFailed(String),
    #[error("no login code was requested in this session")]
    NoPendingEmail,
    #[error("login code expired")]
    LoginCodeExpired,
    #[error("login code does not match")]
    LoginCodeMismatch,
    #[error("user no longer exists")]
    UserVanished,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("invalid refresh token")]
    InvalidRefreshToken,
    #[error("user not found")]
    UserNotFound,
    #[error("blog not found")]
    BlogNotFound,
    #[error("comment not found")]
    CommentNotFound,
    #[error("friend request not found")]
    FriendRequestNotFound,
    #[error("cannot send a friend request to yourself")]
    CannotBefriendSelf,
    #[error("message limit reached, wait for a reply")]
    MessageQuotaExceeded,
    #[error("forbidden")]
    Forbidden,
    #[error("invalid form")]
    Validation(Vec<FieldError>),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl BlindBoxError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownEmail => "UNKNOWN_EMAIL",
            Self::CoolingDown => "COOLING_DOWN",
            Self::MailFailed(_) => "MAIL_FAILED",
            Self::NoPendingEmail => "NO_PENDING_EMAIL",
            Self::LoginCodeExpired => "LOGIN_CODE_EXPIRED",
            Self::LoginCodeMismatch => "LOGIN_CODE_MISMATCH",
            Self::UserVanished => "USER_VANISHED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::BlogNotFound => "BLOG_NOT_FOUND",
            Self::CommentNotFound => "COMMENT_NOT_FOUND",
            Self::FriendRequestNotFound => "FRIEND_REQUEST_NOT_FOUND",
            Self::CannotBefriendSelf => "CANNOT_BEFRIEND_SELF",
            Self::MessageQuotaExceeded => "MESSAGE_QUOTA_EXCEEDED",
            Self::Forbidden => "FORBIDDEN",
            Self::Validation(_) => "INVALID_FORM",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Shorthand for a validation error on a single field.
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }
}

impl IntoResponse for BlindBoxError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UnknownEmail
            | Self::UserNotFound
            | Self::BlogNotFound
            | Self::CommentNotFound
            | Self::FriendRequestNotFound
            | Self::UserVanished => StatusCode::NOT_FOUND,
            Self::CoolingDown => StatusCode::TOO_MANY_REQUESTS,
            Self::MailFailed(_) => StatusCode::BAD_GATEWAY,
            Self::NoPendingEmail | Self::CannotBefriendSelf | Self::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::LoginCodeExpired
            | Self::LoginCodeMismatch
            | Self::InvalidCredentials
            | Self::InvalidRefreshToken => StatusCode::UNAUTHORIZED,
            Self::MessageQuotaExceeded | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        match &self {
            Self::Internal(e) => tracing::error!(error = %e, kind = "INTERNAL", "internal error"),
            Self::MailFailed(reason) => {
                tracing::warn!(reason = %reason, kind = "MAIL_FAILED", "mail delivery failed")
            }
            _ => {}
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Self::Validation(fields) = self {
            body["fields"] = serde_json::json!(fields);
        }
        (status, axum::Json(body)).into_response()
    }
}
