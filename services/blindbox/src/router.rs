use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower_http::trace::TraceLayer;

use blindbox_core::error::not_found;
use blindbox_core::health::{healthz, readyz};
use blindbox_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    auth::{logout, password_login, refresh_token, register},
    blogs::{create_blog, delete_blog, edit_blog, feed, get_blog, my_blogs},
    comments::{add_comment, delete_comment, list_comments},
    friends::{list_pending_requests, respond_to_request, send_request},
    login_code::{get_pending_login, request_login_code, verify_login_code},
    messages::{list_conversations, open_conversation, send_message},
    profile::{blind_date, edit_profile, get_own_profile},
    theme::toggle,
    users::{get_profile_page, list_user_blogs, list_users},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Account
        .route("/auth/register", post(register))
        .route("/auth/login", post(password_login))
        .route("/auth/token", patch(refresh_token).delete(logout))
        // Login code
        .route(
            "/auth/login-code",
            get(get_pending_login).post(request_login_code),
        )
        .route("/auth/login-code/verify", post(verify_login_code))
        // Users and profiles
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_profile_page))
        .route("/users/{id}/blogs", get(list_user_blogs))
        .route("/profile", get(get_own_profile).put(edit_profile))
        .route("/blind-date", get(blind_date))
        // Blogs
        .route("/blogs", get(feed).post(create_blog))
        .route("/blogs/mine", get(my_blogs))
        .route(
            "/blogs/{id}",
            get(get_blog).patch(edit_blog).delete(delete_blog),
        )
        // Comments
        .route("/blogs/{id}/comments", get(list_comments).post(add_comment))
        .route("/comments/{id}", delete(delete_comment))
        // Friends
        .route("/friends/requests", get(list_pending_requests))
        .route("/friends/requests/{id}", post(send_request))
        .route("/friends/requests/{id}/{action}", post(respond_to_request))
        // Messages
        .route("/messages", get(list_conversations))
        .route("/messages/{id}", get(open_conversation).post(send_message))
        // Theme
        .route("/theme", post(toggle))
        .fallback(not_found)
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
