//! Framework plumbing shared by Blind Date Box crates: error envelope, health probes,
//! env-driven config, tracing setup, request-id middleware and sea-orm helpers.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
