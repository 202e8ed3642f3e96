//! Domain types shared across Blind Date Box crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod blog;
pub mod friend;
pub mod pagination;
pub mod profile;
pub mod user;
