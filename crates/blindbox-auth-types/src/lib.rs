//! Auth types shared across Blind Date Box crates.
//!
//! Provides JWT validation, cookie builders, and the `Identity` and `SessionId` extractors.

pub mod cookie;
pub mod identity;
pub mod session;
pub mod token;
