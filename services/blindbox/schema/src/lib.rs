//! sea-orm entities for the Blind Date Box database.

pub mod blogs;
pub mod comments;
pub mod friends;
pub mod messages;
pub mod profiles;
pub mod users;
