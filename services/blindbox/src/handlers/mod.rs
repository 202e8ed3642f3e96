pub mod auth;
pub mod blogs;
pub mod comments;
pub mod friends;
pub mod login_code;
pub mod messages;
pub mod profile;
pub mod theme;
pub mod users;
pub mod view;
