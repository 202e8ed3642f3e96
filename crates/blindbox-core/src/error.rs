use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors raised before a request reaches a use case, such as a rejected auth cookie
/// or an unmatched route. Serialized with the same `{kind, message}` envelope the
/// service uses for its own errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("login required")]
    Unauthorized,
    #[error("no such page")]
    NotFound,
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::NotFound => "NOT_FOUND",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Internal(ref cause) = self {
            tracing::error!(error = %cause, "request failed");
        }
        let body = serde_json::json!({ "kind": self.kind(), "message": self.to_string() });
        (self.status(), axum::Json(body)).into_response()
    }
}

/// Router fallback.
pub async fn not_found() -> AppError {
    AppError::NotFound
}
